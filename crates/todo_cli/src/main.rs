use clap::Parser;
use clap::error::ErrorKind;
use log::info;
use std::io;
use todo_cli::cli::Cli;
use todo_cli::menu::run_menu;
use todo_core::AppError;
use todo_core::config::load_config_with_fallback;
use todo_core::storage::json_store;
use todo_core::task_store::TaskStore;

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn run(cli: Cli) -> Result<(), AppError> {
    let loaded = load_config_with_fallback();
    let path = json_store::store_path(cli.file.as_deref(), loaded.config.store_path.as_deref());

    let mut store = TaskStore::open(path);
    info!("using task file {}", store.path().display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_menu(&mut store, stdin.lock(), stdout.lock())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
