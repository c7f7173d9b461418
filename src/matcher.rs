//! Criteria evaluation for freshly seen listings.
//!
//! Prices are compared after stripping every non-digit character from the
//! listing's price text. When nothing numeric is left the price bounds are
//! skipped rather than failed, so an ad priced "Negotiable" still reaches the
//! keyword check.

use crate::config::Criteria;
use crate::models::Listing;
use tracing::warn;

/// Result of checking one listing against one set of criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub matched: bool,
    /// Price bounds were configured but the price text held no number
    pub price_skipped: bool,
}

/// Numeric value of a free-form price, digits only.
///
/// Digit runs too long for a `u64` saturate, so they still fail `max_price`.
pub fn extract_price(price: &str) -> Option<u64> {
    let mut value: Option<u64> = None;
    for digit in price.chars().filter_map(|c| c.to_digit(10)) {
        let current = value.unwrap_or(0);
        value = Some(
            current
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .unwrap_or(u64::MAX),
        );
    }
    value
}

impl Criteria {
    pub fn has_price_bounds(&self) -> bool {
        self.max_price.is_some() || self.min_price.is_some()
    }

    pub fn evaluate(&self, listing: &Listing) -> Evaluation {
        let mut price_skipped = false;

        if self.has_price_bounds() {
            match extract_price(&listing.price) {
                Some(price) => {
                    if self.max_price.is_some_and(|max| price > max)
                        || self.min_price.is_some_and(|min| price < min)
                    {
                        return Evaluation {
                            matched: false,
                            price_skipped,
                        };
                    }
                }
                None => price_skipped = true,
            }
        }

        let matched = self.keywords.is_empty() || {
            let title = listing.title.to_lowercase();
            self.keywords
                .iter()
                .any(|keyword| title.contains(&keyword.to_lowercase()))
        };

        Evaluation {
            matched,
            price_skipped,
        }
    }
}

/// Check a listing against criteria, logging ads whose price bounds could not
/// be applied.
pub fn matches(listing: &Listing, criteria: &Criteria) -> bool {
    let evaluation = criteria.evaluate(listing);
    if evaluation.price_skipped {
        warn!(
            id = %listing.id,
            source = %listing.source,
            search = %listing.search_name,
            price = %listing.price,
            "Could not read a number from price, skipping price criteria"
        );
    }
    evaluation.matched
}
