use addressbook_core::{default_log_level, CoreConfig};
use clap::Parser;
use std::path::PathBuf;

/// Command-line settings; each value may also come from its `ADDRESSBOOK_*`
/// environment variable, with the flag taking precedence.
#[derive(Parser, Debug)]
#[command(name = "addressbook")]
#[command(version, about = "Menu-driven address book manager")]
pub struct Cli {
    /// Directory holding one `<book>.json` file per address book
    #[arg(long, value_name = "DIR", env = "ADDRESSBOOK_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Keep address books in memory only; overrides --data-dir
    #[arg(long)]
    pub no_persist: bool,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, value_name = "LEVEL", env = "ADDRESSBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging stays off when unset
    #[arg(long, value_name = "DIR", env = "ADDRESSBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolves the effective core configuration.
    pub fn into_config(self) -> CoreConfig {
        CoreConfig {
            data_dir: (!self.no_persist).then_some(self.data_dir),
            log_level: self
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: self.log_dir,
        }
    }
}
