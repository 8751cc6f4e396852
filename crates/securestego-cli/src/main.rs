use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::debug;
use securestego_core::transport::{HttpTransport, TransportError};
use securestego_core::{ClientOptions, WorkflowError};
use thiserror::Error;

use crate::cli::{CliArgs, Commands};

mod cli;
mod commands;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Could not set up the HTTP client: {0}")]
    Client(#[from] TransportError),

    #[error("Could not read the password: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run(CliArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> CliResult<()> {
    let options = ClientOptions::default()
        .with_base_url(args.server)
        .with_timeout(Duration::from_secs(args.timeout));
    debug!("using {:?}", options);
    let transport = HttpTransport::new(options)?;

    match args.command {
        Commands::Encrypt(encrypt) => encrypt.run(&transport).await,
        Commands::Decrypt(decrypt) => decrypt.run(&transport).await,
        Commands::Keygen(keygen) => keygen.run(&transport).await,
    }
}
