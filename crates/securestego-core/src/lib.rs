//! # SecureStego Core API
//!
//! Client side of the SecureStego service. Embedding, extraction, the
//! encryption schemes and the image enhancement all happen remotely, this
//! crate drives the two workflows that talk to it:
//! - [`EncryptWorkflow`][enc] hides a secret image inside a cover image
//! - [`DecryptWorkflow`][dec] recovers the secret image from a stego image,
//!   protected either by a password or by an RSA wrapped session key
//!
//! # Usage Examples
//!
//! ## Hide an image inside another image
//!
//! ```no_run
//! use securestego_core::api::encrypt::{self, EncryptInput};
//! use securestego_core::media::SelectedFile;
//! use securestego_core::transport::{ClientOptions, HttpTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(ClientOptions::default())?;
//!
//! let mut workflow = encrypt::prepare();
//! workflow
//!     .select(EncryptInput::Cover, SelectedFile::from_path("catA.png").await?)
//!     .select(EncryptInput::Secret, SelectedFile::from_path("dog.png").await?)
//!     .set_password("SuperSecret42");
//!
//! let result = workflow.submit(&transport).await?;
//! println!("stego image at {}", result.stego_image);
//! # Ok(())
//! # }
//! ```
//!
//! ## Recover the hidden image
//!
//! ```no_run
//! use securestego_core::api::decrypt::{self, DecryptInput, DecryptMode};
//! use securestego_core::media::SelectedFile;
//! use securestego_core::transport::{ClientOptions, HttpTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(ClientOptions::default())?;
//!
//! let mut workflow = decrypt::prepare();
//! workflow
//!     .select(DecryptInput::Stego, SelectedFile::from_path("stego-image.png").await?)
//!     .set_mode(DecryptMode::Password)
//!     .set_password("SuperSecret42");
//!
//! let result = workflow.submit(&transport).await?;
//! println!("recovered image at {}", result.recovered_image);
//! # Ok(())
//! # }
//! ```
//!
//! [enc]: ./api/encrypt/struct.EncryptWorkflow.html
//! [dec]: ./api/decrypt/struct.DecryptWorkflow.html

#![warn(clippy::redundant_else)]

pub mod api;
pub mod commands;
pub mod error;
pub mod ingestion;
pub mod media;
pub mod progress;
pub mod result;
pub mod status;
pub mod transport;

pub use crate::api::decrypt::{DecryptMode, DecryptResult, DecryptWorkflow};
pub use crate::api::encrypt::{EncryptResult, EncryptWorkflow};
pub use crate::error::{ErrorKind, WorkflowError};
pub use crate::result::Result;
pub use crate::status::{Banner, WorkflowStatus};
pub use crate::transport::ClientOptions;
