use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "carcas",
    version,
    about = "CARCAS specimen collection content switcher",
    long_about = "carcas renders the CARCAS specimen collection pages headlessly: it loads the specimen list, replays UI events against the page and prints the resulting content area.\n\nExamples:\n  carcas -e click:scans-link -e type:bea -e key:Enter\n  carcas --source api --api-url https://sheet.example.org/rows -e click:scan-button:deer-cranium\n  carcas --events-file session.txt -o page.html\n  echo click:lab-link | carcas --interactive\n\nTip: Use --init-config to write ~/.carcas/config.yml and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.carcas/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 's',
        long = "src",
        visible_alias = "source",
        value_name = "SOURCE",
        help_heading = "Data",
        help = "Specimen source: static or api (default: static)."
    )]
    pub source: Option<String>,

    #[arg(
        short = 'a',
        long = "au",
        visible_alias = "api-url",
        value_name = "URL",
        help_heading = "Data",
        help = "Spreadsheet API endpoint returning the specimen rows."
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "vbase",
        visible_alias = "viewer-base",
        value_name = "URL",
        help_heading = "Data",
        help = "Base URL of the 3D viewer pages."
    )]
    pub viewer_base: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Data",
        help = "Remote fetch timeout in seconds (default: 10)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'd',
        long = "sd",
        visible_alias = "swap-delay",
        value_name = "MS",
        help_heading = "Session",
        help = "Fade delay of a content swap in milliseconds (default: 300)."
    )]
    pub swap_delay: Option<u64>,

    #[arg(
        short = 'e',
        long = "ev",
        visible_alias = "event",
        value_name = "EVENT",
        action = ArgAction::Append,
        help_heading = "Session",
        help = "UI event to replay (repeatable), e.g. click:scans-link, type:bea, key:Enter."
    )]
    pub events: Vec<String>,

    #[arg(
        short = 'f',
        long = "ef",
        visible_alias = "events-file",
        value_name = "FILE",
        help_heading = "Session",
        help = "Replay UI events from a file (one per line, # comments)."
    )]
    pub events_file: Option<String>,

    #[arg(
        short = 'i',
        long = "int",
        visible_alias = "interactive",
        help_heading = "Session",
        help = "Read UI events from stdin, printing the outcome of each."
    )]
    pub interactive: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the result to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: html, json or text (default: inferred, else html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'm',
        long = "menus",
        num_args = 0..=1,
        default_missing_value = "true",
        help_heading = "Output",
        help = "Include the animal and bone dropdown menus in html output."
    )]
    pub menus: Option<bool>,
}
