use covert_console::commands::{ConsoleCommand, HELP, parse_command};
use covert_console::error::ConsoleError;
use covert_console::logger::initialize as LoggerInitialize;
use covert_console::render::{LogCursor, render_snapshot};

use covert_core::config::{ClientConfig, config_dir, load_dotenv};
use covert_core::error::CoreError;
use covert_core::session::LogKind;
use covert_core::transport::{FixedTimeout, NoTimeout, OperatorAction, SessionHandle};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ConsoleError> {
    load_dotenv();

    let config_dir = config_dir().map_err(CoreError::from)?;
    let mut config = ClientConfig::load(&config_dir).map_err(CoreError::from)?;
    config.apply_env_overrides().map_err(CoreError::from)?;

    let log_dir = config_dir.join("logs");
    create_dir_all(&log_dir).map_err(|e| ConsoleError::Console {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    LoggerInitialize(&log_dir, config.log_level().map_err(CoreError::from)?)?;

    info!("Covert console starting");
    info!("Config directory: {}", config_dir.display());

    let url = config.endpoint_url().map_err(CoreError::from)?;
    println!("Connecting to {url} ...");

    let handle = match config.ack_timeout() {
        Some(wait) => SessionHandle::connect(&url, FixedTimeout(wait)).await?,
        None => SessionHandle::connect(&url, NoTimeout).await?,
    };

    let cursor = Arc::new(LogCursor::default());
    tokio::spawn(print_events(handle.clone(), Arc::clone(&cursor)));

    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(stdin()).lines();

    loop {
        let line = lines.next_line().await.map_err(|e| ConsoleError::Console {
            message: format!("Failed to read input: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        // End of input behaves like quit.
        let Some(line) = line else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Show => print!("{}", render_snapshot(&handle.snapshot().await)),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Action(action) => {
                if let Err(e) = handle.dispatch(action).await {
                    eprintln!("{e}");
                }
                print_new(&handle, &cursor).await;
            }
        }

        if handle.is_closed() {
            println!("Session ended.");
            return Ok(());
        }
    }

    if !handle.is_closed() {
        handle.dispatch(OperatorAction::Disconnect).await?;
    }
    info!("Covert console exiting");
    Ok(())
}

/// Print status lines as inbound frames arrive.
async fn print_events(handle: SessionHandle, cursor: Arc<LogCursor>) {
    let mut events = handle.subscribe();
    // Lines logged before the subscription started.
    print_new(&handle, &cursor).await;

    loop {
        match events.recv().await {
            Ok(_) | Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                print_new(&handle, &cursor).await;
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }

    // The actor has stopped; show why.
    print_new(&handle, &cursor).await;
}

async fn print_new(handle: &SessionHandle, cursor: &LogCursor) {
    for entry in cursor.take_new(handle).await {
        match entry.kind {
            LogKind::Error => eprintln!("{}", entry.text),
            LogKind::Status | LogKind::Received => println!("{}", entry.text),
        }
    }
}
