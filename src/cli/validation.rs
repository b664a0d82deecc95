use crate::cli::args::CliArgs;
use crate::output::OutputFormat;

pub const MAX_SWAP_DELAY_MS: u64 = 10_000;

pub fn validate_http_url(label: &str, raw: &str) -> Result<(), String> {
    let parsed =
        reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid {label} '{raw}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!(
            "invalid {label} '{raw}': unsupported scheme '{other}', expected http or https"
        )),
    }
}

pub fn validate_source(raw: &str) -> Result<(), String> {
    match raw.trim().to_lowercase().as_str() {
        "static" | "api" => Ok(()),
        _ => Err(format!("invalid source '{raw}', expected static or api")),
    }
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.source.as_deref() {
        validate_source(raw)?;
    }
    if let Some(raw) = args.api_url.as_deref() {
        validate_http_url("--api-url", raw)?;
    }
    if let Some(raw) = args.viewer_base.as_deref() {
        validate_http_url("--viewer-base", raw)?;
    }
    if let Some(delay) = args.swap_delay {
        if delay > MAX_SWAP_DELAY_MS {
            return Err(format!(
                "invalid swap-delay {delay}, expected at most {MAX_SWAP_DELAY_MS}ms"
            ));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected html, json or text"
            ));
        }
    }
    Ok(())
}
