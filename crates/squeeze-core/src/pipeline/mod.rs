//! Recompression pipeline components.
//!
//! - **decode**: Load and decode source images
//! - **normalize**: Flatten alpha and convert to 8-bit RGB
//! - **encode**: JPEG encoding at a given quality
//! - **ladder**: The descending quality levels and the budget search
//! - **recompress**: One job, end to end
//! - **discovery**: Find the newest source for a job name
//! - **runner**: Runs configured jobs sequentially

pub mod decode;
pub mod discovery;
pub mod encode;
pub mod ladder;
pub mod normalize;
pub mod recompress;
pub mod runner;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, SourceLocator};
pub use encode::encode_jpeg;
pub use ladder::{search, QualityLadder, Search};
pub use normalize::normalize;
pub use recompress::{compress, Recompressor};
pub use runner::JobRunner;
