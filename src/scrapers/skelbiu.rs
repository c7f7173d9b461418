use crate::error::{Result, TrackerError};
use crate::models::Listing;
use crate::scrapers::traits::ListingExtractor;
use crate::scrapers::types::{attr_of, text_of, SiteLayout, Selectors};
use scraper::Html;
use tracing::{debug, info, warn};

pub const LAYOUT: SiteLayout = SiteLayout {
    source: "skelbiu",
    base_url: "https://www.skelbiu.lt",
    container: ".standard-list-item",
    title: ".item-title",
    price: ".item-price",
    link: "a.item-link",
    image: ".item-image img",
    id_attr: "data-item-id",
    strip_id_extension: true,
};

/// Skelbiu.lt general classifieds
pub struct SkelbiuExtractor {
    selectors: Selectors,
}

impl SkelbiuExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: LAYOUT.compile()?,
        })
    }
}

impl ListingExtractor for SkelbiuExtractor {
    fn extract(&self, html: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(html);
        let containers: Vec<_> = document.select(&self.selectors.container).collect();

        if containers.is_empty() {
            warn!("No ad containers found on Skelbiu. Site structure may have changed.");
            return Err(TrackerError::parse(LAYOUT.source, "no ad containers found"));
        }

        let mut listings = Vec::with_capacity(containers.len());
        for container in containers {
            let (Some(title), Some(href)) = (
                text_of(container, &self.selectors.title),
                attr_of(container, &self.selectors.link, "href"),
            ) else {
                debug!("Skipping Skelbiu ad without title or link");
                continue;
            };

            let Some(id) = LAYOUT.listing_id(container, Some(href)) else {
                debug!(href, "Skipping Skelbiu ad without an id");
                continue;
            };

            let price = text_of(container, &self.selectors.price).unwrap_or_else(|| "N/A".to_string());
            let image = attr_of(container, &self.selectors.image, "src").unwrap_or_default();
            listings.push(Listing::new(id, title, price, LAYOUT.absolute_link(href)).with_image(image));
        }

        info!("Found {} ads on Skelbiu", listings.len());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        LAYOUT.source
    }
}
