pub mod image_ref;
mod types;

pub use image_ref::{ImageRef, InlineImage, Preview};
pub use types::*;
