use crate::error::{Result, TrackerError};
use crate::models::Listing;
use crate::scrapers::traits::ListingExtractor;
use crate::scrapers::types::{attr_of, text_of, SiteLayout, Selectors};
use scraper::Html;
use tracing::{debug, info, warn};

pub const LAYOUT: SiteLayout = SiteLayout {
    source: "aruodas",
    base_url: "https://www.aruodas.lt",
    container: ".list-row",
    title: ".list-line-title",
    price: ".list-item-price",
    link: "a.item-link",
    image: ".list-photo img",
    id_attr: "data-id",
    strip_id_extension: true,
};

/// Aruodas.lt real estate listings
///
/// Rows are loosely structured: any link in the row is accepted when the
/// dedicated one is missing, and a row needs only a title or a link.
pub struct AruodasExtractor {
    selectors: Selectors,
}

impl AruodasExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: LAYOUT.compile()?,
        })
    }
}

impl ListingExtractor for AruodasExtractor {
    fn extract(&self, html: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(html);
        let containers: Vec<_> = document.select(&self.selectors.container).collect();

        if containers.is_empty() {
            warn!("No ad containers found on Aruodas. Site structure may have changed.");
            return Err(TrackerError::parse(LAYOUT.source, "no ad containers found"));
        }

        let mut listings = Vec::with_capacity(containers.len());
        for container in containers {
            let title = text_of(container, &self.selectors.title);
            let href = attr_of(container, &self.selectors.link, "href")
                .or_else(|| attr_of(container, &self.selectors.any_link, "href"));

            if title.is_none() && href.is_none() {
                debug!("Skipping Aruodas row without title or link");
                continue;
            }

            let Some(id) = LAYOUT.listing_id(container, href) else {
                debug!("Skipping Aruodas row without an id");
                continue;
            };

            let price = text_of(container, &self.selectors.price).unwrap_or_else(|| "N/A".to_string());
            let link = href.map(|h| LAYOUT.absolute_link(h)).unwrap_or_default();
            let image = attr_of(container, &self.selectors.image, "src").unwrap_or_default();

            listings.push(
                Listing::new(id, title.unwrap_or_else(|| "No title".to_string()), price, link)
                    .with_image(image),
            );
        }

        info!("Found {} ads on Aruodas", listings.len());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        LAYOUT.source
    }
}
