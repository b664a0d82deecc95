use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub source: Option<String>,
    #[serde(alias = "sheet_url")]
    pub api_url: Option<String>,
    pub viewer_base: Option<String>,
    pub swap_delay_ms: Option<u64>,
    pub timeout: Option<u64>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub menus: Option<bool>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".carcas").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<ConfigFile, String> {
    serde_yaml::from_str::<ConfigFile>(contents)
        .map_err(|e| format!("failed to parse config '{}': {e}", origin.display()))
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# carcas config
#
# Location (default):
#   ~/.carcas/config.yml

# Specimen data: "static" uses the built-in list, "api" fetches the
# spreadsheet-backed endpoint once at startup.
source: static
# api_url: https://sheet.example.org/api/specimens

# Base URL of the embedded 3D viewer pages ({base}/{viewer_id}.html)
viewer_base: https://3dviewer.sites.carleton.edu/carcas/html-files

# Fade delay of the content swap, in milliseconds
swap_delay_ms: 300

# Remote fetch timeout, in seconds
timeout: 10

# Output (optional)
# output: ./page.html
# output_format: html
menus: false

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg = parse_config(&default_config_yaml(), Path::new("default")).unwrap();
        assert_eq!(cfg.source.as_deref(), Some("static"));
        assert_eq!(cfg.swap_delay_ms, Some(300));
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.api_url, None);
        assert_eq!(cfg.menus, Some(false));
    }

    #[test]
    fn sheet_url_alias_is_accepted() {
        let cfg = parse_config(
            "source: api\nsheet_url: https://sheet.example.org/rows\n",
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(cfg.api_url.as_deref(), Some("https://sheet.example.org/rows"));
    }

    #[test]
    fn bad_yaml_reports_origin() {
        let err = parse_config("swap_delay_ms: soon", Path::new("/tmp/c.yml")).unwrap_err();
        assert!(err.contains("/tmp/c.yml"));
    }

    #[test]
    fn missing_file_handling() {
        let path = env::temp_dir().join("carcas-config-test-missing").join("none.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).unwrap_err().contains("not found"));
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = env::temp_dir().join(format!("carcas-config-test-{}", std::process::id()));
        let path = dir.join("config.yml");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        assert!(load_config(&path, false).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/x.yml"), home.join("x.yml"));
        }
        assert_eq!(expand_tilde("/etc/x.yml"), PathBuf::from("/etc/x.yml"));
    }
}
