use crate::error::{Result, TrackerError};
use scraper::{ElementRef, Selector};

/// CSS layout of a site's search results page
#[derive(Debug, Clone)]
pub struct SiteLayout {
    /// Source name in the configuration
    pub source: &'static str,
    /// Prefix for relative links
    pub base_url: &'static str,
    /// One element per ad
    pub container: &'static str,
    pub title: &'static str,
    pub price: &'static str,
    pub link: &'static str,
    pub image: &'static str,
    /// Container attribute carrying the site's own ad id
    pub id_attr: &'static str,
    /// Drop a trailing ".html" style extension when deriving ids from links
    pub strip_id_extension: bool,
}

/// Compiled selectors for a `SiteLayout`
#[derive(Debug)]
pub struct Selectors {
    pub container: Selector,
    pub title: Selector,
    pub price: Selector,
    pub link: Selector,
    pub image: Selector,
    pub any_link: Selector,
}

impl SiteLayout {
    pub fn compile(&self) -> Result<Selectors> {
        let parse = |css: &str| {
            Selector::parse(css)
                .map_err(|e| TrackerError::parse(self.source, format!("bad selector {css:?}: {e}")))
        };

        Ok(Selectors {
            container: parse(self.container)?,
            title: parse(self.title)?,
            price: parse(self.price)?,
            link: parse(self.link)?,
            image: parse(self.image)?,
            any_link: parse("a")?,
        })
    }

    /// Make a scraped href absolute
    pub fn absolute_link(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", self.base_url, href)
        }
    }

    /// Site id from the container attribute, else from the link's last path segment
    pub fn listing_id(&self, container: ElementRef<'_>, href: Option<&str>) -> Option<String> {
        if let Some(id) = container.value().attr(self.id_attr) {
            let id = id.trim();
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }

        let href = href?;
        let path = href.split(['?', '#']).next().unwrap_or(href);
        let segment = path.rsplit('/').find(|s| !s.is_empty())?;
        let segment = if self.strip_id_extension {
            segment.split('.').next().unwrap_or(segment)
        } else {
            segment
        };

        (!segment.is_empty()).then(|| segment.to_string())
    }
}

/// Trimmed text of the first element matching `selector`
pub fn text_of(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

/// Attribute of the first element matching `selector`
pub fn attr_of<'a>(element: ElementRef<'a>, selector: &Selector, name: &str) -> Option<&'a str> {
    element.select(selector).next().and_then(|el| el.value().attr(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const LAYOUT: SiteLayout = SiteLayout {
        source: "test",
        base_url: "https://example.lt",
        container: ".ad",
        title: ".title",
        price: ".price",
        link: "a",
        image: "img",
        id_attr: "data-id",
        strip_id_extension: true,
    };

    fn first_ad(html: &str) -> (Html, Selectors) {
        (Html::parse_fragment(html), LAYOUT.compile().unwrap())
    }

    #[test]
    fn prefers_the_id_attribute() {
        let (doc, selectors) = first_ad(r#"<div class="ad" data-id="555"><a href="/x/123.html">x</a></div>"#);
        let ad = doc.select(&selectors.container).next().unwrap();
        assert_eq!(LAYOUT.listing_id(ad, Some("/x/123.html")), Some("555".to_string()));
    }

    #[test]
    fn falls_back_to_last_path_segment() {
        let (doc, selectors) = first_ad(r#"<div class="ad"><a href="/x/123.html">x</a></div>"#);
        let ad = doc.select(&selectors.container).next().unwrap();
        assert_eq!(LAYOUT.listing_id(ad, Some("/x/123.html?ref=list")), Some("123".to_string()));
        assert_eq!(LAYOUT.listing_id(ad, Some("/x/456/")), Some("456".to_string()));
        assert_eq!(LAYOUT.listing_id(ad, None), None);
    }

    #[test]
    fn absolutizes_relative_links_only() {
        assert_eq!(LAYOUT.absolute_link("/ad/1"), "https://example.lt/ad/1");
        assert_eq!(LAYOUT.absolute_link("https://other.lt/ad/1"), "https://other.lt/ad/1");
    }
}
