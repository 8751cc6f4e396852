use clap::{Parser, Subcommand};
use securestego_core::progress::Checkpoint;
use securestego_core::transport::DEFAULT_BASE_URL;
use securestego_core::Banner;

use crate::commands::*;
use crate::CliResult;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Base URL of the SecureStego service
    #[arg(long, global = true, value_name = "url", default_value = DEFAULT_BASE_URL)]
    pub server: String,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "seconds", default_value = "60")]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Encrypt(encrypt::EncryptArgs),
    Decrypt(decrypt::DecryptArgs),
    Keygen(keygen::KeygenArgs),
}

pub fn ask_for_password(prompt: &str) -> CliResult<String> {
    Ok(dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()?)
}

pub fn show_progress(checkpoint: &Checkpoint) {
    eprintln!("[{:>3}%] {}", checkpoint.percent, checkpoint.label);
}

pub fn show_banner(banner: &Banner) {
    match banner {
        Banner::Success(text) => println!("{text}"),
        Banner::Partial(text) => println!("Warning: {text}"),
        Banner::Error(text) => eprintln!("Error: {text}"),
    }
}
