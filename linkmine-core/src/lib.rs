pub mod aggregate;
pub mod error;
pub mod index;
pub mod record;
pub mod resolve;
pub mod summary;

pub use aggregate::{KeywordAggregator, KeywordIndex, main_domain};
pub use error::{IssueCallback, KeywordError};
pub use index::{AnchorLinkIndex, LinkIndexBuilder};
pub use record::{Record, RecordWriter, read_records};
pub use resolve::{DomainKeywordResolver, DomainMemo, is_numeric, longest_suffix_mismatch};
pub use summary::{RunSummary, generate_summary_report};
