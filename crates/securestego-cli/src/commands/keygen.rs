use std::path::PathBuf;

use clap::Args;
use securestego_core::commands;
use securestego_core::transport::Transport;

use crate::CliResult;

/// Lets the service generate an RSA key pair for key based recovery
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// private.pem and public.pem will be stored in that folder
    #[arg(short, long = "out", value_name = "output folder", default_value = ".")]
    pub output_folder: PathBuf,
}

impl KeygenArgs {
    pub async fn run<T: Transport + ?Sized>(self, transport: &T) -> CliResult<()> {
        let (private_key, public_key) =
            commands::generate_keys(transport, &self.output_folder).await?;

        println!("Private key: {}", private_key.display());
        println!("Public key:  {}", public_key.display());
        println!("Share the public key with senders, keep the private key to yourself.");

        Ok(())
    }
}
