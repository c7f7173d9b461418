use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraped classified ad, independent of the site it came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Listing {
    /// Identity key, stable across runs for the same ad
    pub id: String,
    pub title: String,
    /// Free-form price text as shown on the site ("12 500 €", "N/A", ...)
    pub price: String,
    pub link: String,
    /// Empty when the ad has no picture
    pub image_url: String,
    /// Filled in by the pipeline, never by an extractor
    pub source: String,
    /// Filled in by the pipeline, never by an extractor
    pub search_name: String,
}

impl Listing {
    /// Create a listing as an extractor sees it, without source or search tags
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: price.into(),
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}

/// Persisted projection of a listing, written once on first sight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeenRecord {
    pub id: String,
    pub title: String,
    pub price: String,
    pub link: String,
    pub image_url: String,
    pub first_seen: DateTime<Utc>,
    pub source: String,
}

impl SeenRecord {
    pub fn from_listing(listing: &Listing, first_seen: DateTime<Utc>) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            price: listing.price.clone(),
            link: listing.link.clone(),
            image_url: listing.image_url.clone(),
            first_seen,
            source: listing.source.clone(),
        }
    }
}
