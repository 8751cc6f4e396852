use std::path::PathBuf;

use clap::Args;
use securestego_core::api::encrypt::STEGO_DOWNLOAD_NAME;
use securestego_core::commands::{self, EncryptOptions};
use securestego_core::transport::Transport;

use crate::cli::{ask_for_password, show_banner, show_progress};
use crate::CliResult;

/// Hides a secret image inside a cover image
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Image that carries the secret, used readonly
    #[arg(short, long, value_name = "cover image")]
    pub cover: PathBuf,

    /// Image to hide
    #[arg(short, long, value_name = "secret image")]
    pub secret: PathBuf,

    /// Password used to encrypt the secret image
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,

    /// Prompt for the password instead of passing it as argument
    #[arg(short = 'P', long, conflicts_with = "password")]
    pub ask_password: bool,

    /// Send the stego image to this address
    #[arg(short, long, value_name = "email")]
    pub email: Option<String>,

    /// PEM file with the recipient's RSA public key
    #[arg(short = 'k', long = "public-key", value_name = "public key file")]
    pub public_key: Option<PathBuf>,

    /// Stego image will be stored as file
    #[arg(short, long = "out", value_name = "output image file", default_value = STEGO_DOWNLOAD_NAME)]
    pub output: PathBuf,
}

impl EncryptArgs {
    pub async fn run<T: Transport + ?Sized>(self, transport: &T) -> CliResult<()> {
        let password = if self.ask_password {
            Some(ask_for_password("Password")?)
        } else {
            self.password
        };
        let options = EncryptOptions {
            password: password.into(),
            email: self.email,
            receiver_public_key: self.public_key,
        };

        let result =
            commands::encrypt(transport, &self.cover, &self.secret, options, show_progress).await?;
        commands::save_image(transport, &result.stego_image, &self.output).await?;

        show_banner(&result.banner());
        println!("Stego image saved to {}", self.output.display());
        if let Some(wrapped_key) = &result.wrapped_key {
            println!("Encrypted key for the recipient:\n{wrapped_key}");
        }

        Ok(())
    }
}
