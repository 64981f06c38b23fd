pub mod listing_extractor;
pub mod record;

pub use listing_extractor::{Extraction, ListingExtractor};
pub use record::ListingRecord;
