use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::api::decrypt::{self, DecryptInput, DecryptMode, DecryptResult};
use crate::api::encrypt::{self, EncryptInput, EncryptResult};
use crate::api::{read_success, FailureMessages, Password};
use crate::media::{ImageRef, SelectedFile};
use crate::progress::Checkpoint;
use crate::transport::contract::KeyPair;
use crate::transport::{Endpoint, Transport};
use crate::{Result, WorkflowError};

pub const PRIVATE_KEY_FILE: &str = "private.pem";
pub const PUBLIC_KEY_FILE: &str = "public.pem";

const KEYGEN_MESSAGES: FailureMessages = FailureMessages {
    rejected: "Key generation failed",
    unreachable: "An error occurred during key generation",
};

const DOWNLOAD_MESSAGES: FailureMessages = FailureMessages {
    rejected: "Image download failed",
    unreachable: "An error occurred while downloading the image",
};

/// Everything of an encrypt run besides the two images.
#[derive(Debug, Default)]
pub struct EncryptOptions {
    pub password: Password,
    pub email: Option<String>,
    /// PEM file holding the recipient's public key
    pub receiver_public_key: Option<PathBuf>,
}

/// The secret that unlocks a stego image.
#[derive(Debug)]
pub enum DecryptSecret {
    Password(Password),
    RsaHybrid {
        private_key: PathBuf,
        wrapped_key: String,
    },
}

pub async fn encrypt<T: Transport + ?Sized>(
    transport: &T,
    cover: &Path,
    secret: &Path,
    options: EncryptOptions,
    on_progress: impl FnMut(&Checkpoint) + Send + 'static,
) -> Result<EncryptResult> {
    let mut workflow = encrypt::prepare();
    workflow
        .select(EncryptInput::Cover, SelectedFile::from_path(cover).await?)
        .select(EncryptInput::Secret, SelectedFile::from_path(secret).await?)
        .set_password(options.password)
        .on_progress(on_progress);

    if let Some(email) = options.email {
        workflow.set_email(email);
    }
    if let Some(key_file) = options.receiver_public_key {
        let pem = tokio::fs::read_to_string(&key_file)
            .await
            .map_err(|source| WorkflowError::ReadError { source })?;
        workflow.set_receiver_public_key(pem);
    }

    workflow.submit(transport).await.cloned()
}

pub async fn decrypt<T: Transport + ?Sized>(
    transport: &T,
    stego: &Path,
    secret: DecryptSecret,
    on_progress: impl FnMut(&Checkpoint) + Send + 'static,
) -> Result<DecryptResult> {
    let mut workflow = decrypt::prepare();
    workflow
        .select(DecryptInput::Stego, SelectedFile::from_path(stego).await?)
        .on_progress(on_progress);

    match secret {
        DecryptSecret::Password(password) => {
            workflow
                .set_mode(DecryptMode::Password)
                .set_password(password);
        }
        DecryptSecret::RsaHybrid {
            private_key,
            wrapped_key,
        } => {
            workflow
                .set_mode(DecryptMode::RsaHybrid)
                .select(
                    DecryptInput::PrivateKey,
                    SelectedFile::from_path(private_key).await?,
                )
                .set_wrapped_key(wrapped_key);
        }
    }

    workflow.submit(transport).await.cloned()
}

/// Asks the service for a fresh RSA key pair and stores it in `destination`.
///
/// Returns the paths of the private and the public key file.
pub async fn generate_keys<T: Transport + ?Sized>(
    transport: &T,
    destination: &Path,
) -> Result<(PathBuf, PathBuf)> {
    let response = transport
        .get(Endpoint::GenerateKeys.path())
        .await
        .map_err(|e| {
            warn!("key generation request failed: {e}");
            WorkflowError::RequestFailed(KEYGEN_MESSAGES.unreachable.to_string())
        })?;
    let pair: KeyPair = read_success(response, &KEYGEN_MESSAGES)?;

    let private_key = destination.join(PRIVATE_KEY_FILE);
    let public_key = destination.join(PUBLIC_KEY_FILE);
    write(&private_key, pair.private_key_pem.as_bytes()).await?;
    write(&public_key, pair.public_key_pem.as_bytes()).await?;
    info!("key pair written to {}", destination.display());

    Ok((private_key, public_key))
}

/// Stores an image returned by the service at `destination`.
///
/// Inline data URIs are decoded locally, URLs are fetched once.
pub async fn save_image<T: Transport + ?Sized>(
    transport: &T,
    image: &ImageRef,
    destination: &Path,
) -> Result<()> {
    let data = match image.inline() {
        Some(inline) => inline?.data,
        None => {
            let response = transport.get(image.as_str()).await.map_err(|e| {
                warn!("fetching {} failed: {e}", image);
                WorkflowError::RequestFailed(DOWNLOAD_MESSAGES.unreachable.to_string())
            })?;
            if !response.is_success() {
                warn!("fetching {} answered {}", image, response.status);
                return Err(WorkflowError::RequestFailed(
                    DOWNLOAD_MESSAGES.rejected.to_string(),
                ));
            }
            response.body
        }
    };

    write(destination, &data).await?;
    info!("saved {} bytes to {}", data.len(), destination.display());

    Ok(())
}

async fn write(path: &Path, data: &[u8]) -> Result<()> {
    tokio::fs::write(path, data)
        .await
        .map_err(|source| WorkflowError::WriteError { source })
}
