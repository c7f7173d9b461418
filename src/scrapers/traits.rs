use crate::error::Result;
use crate::models::Listing;

/// Common trait for all site extractors
/// This allows easy addition of new sources, each keeping its own markup rules
pub trait ListingExtractor: Send + Sync {
    /// Turn one fetched results page into listings.
    ///
    /// Returns `TrackerError::Parse` when the page no longer has the expected
    /// structure, and an empty vector only when the page genuinely lists
    /// nothing usable. Never fills in `source` or `search_name`.
    fn extract(&self, html: &str) -> Result<Vec<Listing>>;

    /// Get the name of the source, as used in the configuration
    fn source_name(&self) -> &'static str;
}
