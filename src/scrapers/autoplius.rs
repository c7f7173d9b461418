use crate::error::{Result, TrackerError};
use crate::models::Listing;
use crate::scrapers::traits::ListingExtractor;
use crate::scrapers::types::{attr_of, text_of, SiteLayout, Selectors};
use scraper::Html;
use tracing::{debug, info, warn};

pub const LAYOUT: SiteLayout = SiteLayout {
    source: "autoplius",
    base_url: "https://autoplius.lt",
    container: ".announcement-item",
    title: ".announcement-title",
    price: ".price",
    link: "a.announcement-item-link",
    image: "img",
    id_attr: "data-id",
    strip_id_extension: false,
};

/// Autoplius.lt car listings
pub struct AutopliusExtractor {
    selectors: Selectors,
}

impl AutopliusExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: LAYOUT.compile()?,
        })
    }
}

impl ListingExtractor for AutopliusExtractor {
    fn extract(&self, html: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(html);
        let containers: Vec<_> = document.select(&self.selectors.container).collect();

        if containers.is_empty() {
            warn!("No ad containers found on Autoplius. Site structure may have changed.");
            return Err(TrackerError::parse(LAYOUT.source, "no ad containers found"));
        }

        let mut listings = Vec::with_capacity(containers.len());
        for container in containers {
            // Title, price and link are all required here
            let (Some(title), Some(price), Some(href)) = (
                text_of(container, &self.selectors.title),
                text_of(container, &self.selectors.price),
                attr_of(container, &self.selectors.link, "href"),
            ) else {
                debug!("Skipping Autoplius ad without title, price or link");
                continue;
            };

            let Some(id) = LAYOUT.listing_id(container, Some(href)) else {
                debug!(href, "Skipping Autoplius ad without an id");
                continue;
            };

            let image = attr_of(container, &self.selectors.image, "src").unwrap_or_default();
            listings.push(Listing::new(id, title, price, LAYOUT.absolute_link(href)).with_image(image));
        }

        info!("Found {} ads on Autoplius", listings.len());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        LAYOUT.source
    }
}
