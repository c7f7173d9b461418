//! Dedup-and-match: the step between raw extractions and the digest.

use crate::config::SearchSpec;
use crate::error::Result;
use crate::matcher::matches;
use crate::models::Listing;
use crate::store::SeenStore;
use tracing::{debug, info};

/// Reduce one search's raw listings to those that are both new and matching.
///
/// New listings are written to the store before any criteria are checked, so
/// a listing that fails the criteria today will never be reconsidered, and a
/// crash after the insert means the listing is simply treated as seen next
/// time. Output keeps the order of `raw`.
pub fn process<S: SeenStore + ?Sized>(
    store: &mut S,
    source_name: &str,
    search: &SearchSpec,
    raw: Vec<Listing>,
) -> Result<Vec<Listing>> {
    let total = raw.len();
    let mut fresh = Vec::new();

    for mut listing in raw {
        listing.source = source_name.to_string();
        listing.search_name = search.name.clone();

        if store.exists(&listing.id)? {
            debug!(id = %listing.id, "Already seen");
            continue;
        }

        store.insert(&listing)?;
        fresh.push(listing);
    }

    let new_count = fresh.len();
    let matching: Vec<Listing> = fresh
        .into_iter()
        .filter(|listing| matches(listing, &search.criteria))
        .collect();

    info!(
        source = source_name,
        search = %search.name,
        total,
        new = new_count,
        matching = matching.len(),
        "Processed search results"
    );

    Ok(matching)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Criteria;
    use crate::store::SqliteSeenStore;

    fn search(criteria: Criteria) -> SearchSpec {
        SearchSpec {
            name: "cheap-cars".into(),
            url: Some("https://autoplius.lt/skelbimai".into()),
            criteria,
        }
    }

    fn raw(id: &str, title: &str, price: &str) -> Listing {
        Listing::new(id, title, price, format!("https://autoplius.lt/{id}"))
    }

    #[test]
    fn stamps_source_and_search_name() {
        let mut store = SqliteSeenStore::open_in_memory().unwrap();
        let out = process(
            &mut store,
            "autoplius",
            &search(Criteria::default()),
            vec![raw("1", "BMW", "1000")],
        )
        .unwrap();

        assert_eq!(out[0].source, "autoplius");
        assert_eq!(out[0].search_name, "cheap-cars");
        assert_eq!(store.get("1").unwrap().unwrap().source, "autoplius");
    }

    #[test]
    fn preserves_input_order() {
        let mut store = SqliteSeenStore::open_in_memory().unwrap();
        let out = process(
            &mut store,
            "autoplius",
            &search(Criteria::default()),
            vec![raw("a", "A", "1"), raw("b", "B", "2"), raw("c", "C", "3")],
        )
        .unwrap();

        let ids: Vec<&str> = out.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn non_matching_new_listings_are_still_recorded() {
        let mut store = SqliteSeenStore::open_in_memory().unwrap();
        let criteria = Criteria {
            keywords: vec!["bmw".into()],
            ..Default::default()
        };

        let out = process(
            &mut store,
            "autoplius",
            &search(criteria),
            vec![raw("1", "Audi A4", "3000")],
        )
        .unwrap();

        assert!(out.is_empty());
        assert!(store.exists("1").unwrap());
    }

    #[test]
    fn repeated_id_within_one_batch_is_inserted_once() {
        let mut store = SqliteSeenStore::open_in_memory().unwrap();
        let out = process(
            &mut store,
            "autoplius",
            &search(Criteria::default()),
            vec![raw("1", "BMW", "1000"), raw("1", "BMW again", "1000")],
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "BMW");
        assert_eq!(store.count().unwrap(), 1);
    }
}
