use std::path::PathBuf;

use clap::Args;
use securestego_core::commands::{self, DecryptSecret};
use securestego_core::transport::Transport;

use crate::cli::{ask_for_password, show_banner, show_progress};
use crate::CliResult;

/// Recovers the secret image from a stego image
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Stego image that contains the secret image
    #[arg(short = 'i', long = "in", value_name = "stego image")]
    pub stego: PathBuf,

    /// Password used during encryption, prompted for when omitted
    #[arg(short, long, value_name = "password", conflicts_with = "private_key")]
    pub password: Option<String>,

    /// PEM file with your RSA private key, switches to key based recovery
    #[arg(short = 'k', long = "private-key", value_name = "private key file")]
    pub private_key: Option<PathBuf>,

    /// The encrypted key you received along with the stego image
    #[arg(short = 'e', long = "encrypted-key", value_name = "base64 key", requires = "private_key")]
    pub encrypted_key: Option<String>,

    /// Recovered image will be stored as file
    #[arg(short, long = "out", value_name = "output image file", default_value = "recovered-image.png")]
    pub output: PathBuf,
}

impl DecryptArgs {
    fn secret(self) -> CliResult<DecryptSecret> {
        if let Some(private_key) = self.private_key {
            return Ok(DecryptSecret::RsaHybrid {
                private_key,
                wrapped_key: self.encrypted_key.unwrap_or_default(),
            });
        }

        let password = match self.password {
            Some(password) => password,
            None => ask_for_password("Password used during encryption")?,
        };
        Ok(DecryptSecret::Password(password.into()))
    }

    pub async fn run<T: Transport + ?Sized>(self, transport: &T) -> CliResult<()> {
        let stego = self.stego.clone();
        let output = self.output.clone();
        let secret = self.secret()?;

        let result = commands::decrypt(transport, &stego, secret, show_progress).await?;
        commands::save_image(transport, &result.recovered_image, &output).await?;

        show_banner(&result.banner());
        println!("{}  ->  {}", stego.display(), output.display());

        Ok(())
    }
}
