pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod record;

pub use error::ScanError;
pub use extractor::{MemorialPageExtractor, RecordExtractor};
pub use fetcher::{HttpFetcher, RecordFetcher};
pub use record::{Identifier, PersonFields, RelationKind, RelationRef, Vital};
