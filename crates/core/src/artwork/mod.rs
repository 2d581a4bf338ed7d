//! Cover art detection and acquisition.
//!
//! Resolution order for a job:
//! 1. Embedded picture stream in the input (kept as-is)
//! 2. Web image search on the clean title, first valid candidate wins
//! 3. No art
//!
//! Neither a failed probe nor an exhausted search fails the job.

mod bing;
mod config;
mod encode;
mod error;
mod http;
mod probe;
mod resolver;
mod traits;
mod types;

pub use bing::BingImageSearcher;
pub use config::ArtConfig;
pub use error::ArtError;
pub use http::HttpImageFetcher;
pub use probe::has_embedded_visual_stream;
pub use resolver::CoverArtResolver;
pub use traits::{ArtSearcher, ImageFetcher};
pub use types::{CoverArtState, FetchedArt, FetchedImage, ImageLocation, InlineFormat};
