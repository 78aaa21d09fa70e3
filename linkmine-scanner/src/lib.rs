pub mod error;
pub mod fetcher;
pub mod result;

pub use error::ScanError;
pub use fetcher::{AnchorFetcher, extract_anchor_links};
pub use result::AnchorLink;
