use clap::Parser;
use std::path::PathBuf;

/// Interactive to-do list kept in a local JSON file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Task file to use (default: $TODOAPP_STORE_PATH, the config file, then ./tasks.json)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}
