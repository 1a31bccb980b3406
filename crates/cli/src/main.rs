use crate::{
    commands::Commands,
    env::ConfigFile,
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
    stream::stream_records,
};
use clap::Parser;
use engine_runtime::{
    connectors::{destination::SheetsDestination, source::SheetsSource},
    spec::{destination_parameters, source_parameters},
};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod input;
mod position;
mod shutdown;
mod stream;

#[derive(Parser)]
#[command(
    name = "sheetsync",
    version,
    about = "Change capture and append connector for Google Sheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let code = match run(cli.command, shutdown.cancel_token()).await {
        Ok(()) => ExitCode::Success,
        Err(e) if e.is_shutdown() || shutdown.is_shutdown_requested() => {
            info!("Stopped on shutdown request");
            ExitCode::ShutdownRequested
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::GeneralError
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(command: Commands, cancel: CancellationToken) -> Result<(), CliError> {
    match command {
        Commands::Read {
            config,
            position_file,
        } => read(&config, position_file, &cancel).await,
        Commands::Write { config, batch_size } => {
            write(&config, batch_size as usize, &cancel).await
        }
        Commands::Spec => {
            let spec = serde_json::json!({
                "source": source_parameters(),
                "destination": destination_parameters(),
            });
            let json = serde_json::to_string_pretty(&spec).map_err(CliError::JsonSerialize)?;
            println!("{json}");
            Ok(())
        }
    }
}

async fn read(
    config: &Path,
    position_file: Option<PathBuf>,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let config = ConfigFile::load(config)?;
    let mut source = SheetsSource::new();
    source.configure(config.vars())?;

    let start = match &position_file {
        Some(path) => position::load(path).await?,
        None => None,
    };
    source.open(start.as_ref()).await?;

    let mut stdout = tokio::io::stdout();
    let result = stream_records(&mut source, &mut stdout, position_file.as_deref(), cancel).await;
    source.teardown();
    result.map(|_| ())
}

async fn write(config: &Path, batch_size: usize, cancel: &CancellationToken) -> Result<(), CliError> {
    let config = ConfigFile::load(config)?;
    let mut destination = SheetsDestination::new();
    destination.configure(config.vars())?;
    destination.open().await?;

    let result = append_stdin(&mut destination, batch_size, cancel).await;
    destination.teardown();
    result
}

async fn append_stdin(
    destination: &mut SheetsDestination,
    batch_size: usize,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut batch = Vec::with_capacity(batch_size);
    let mut line_num = 0;
    let mut written = 0;

    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CliError::ShutdownRequested),
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        line_num += 1;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = input::parse_record(line).map_err(|source| CliError::InputParse {
            line: line_num,
            source,
        })?;
        batch.push(record);

        if batch.len() >= batch_size {
            written += destination.write(&batch, cancel).await?;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        written += destination.write(&batch, cancel).await?;
    }

    info!(records = written, "Input exhausted");
    Ok(())
}
