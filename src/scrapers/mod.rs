pub mod aruodas;
pub mod autoplius;
pub mod skelbiu;
pub mod traits;
pub mod types;

pub use aruodas::AruodasExtractor;
pub use autoplius::AutopliusExtractor;
pub use skelbiu::SkelbiuExtractor;
pub use traits::ListingExtractor;

use crate::error::Result;
use std::collections::HashMap;

/// Extractors keyed by the source name used in the configuration
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, Box<dyn ListingExtractor>>,
}

impl ExtractorRegistry {
    /// Registry with every site this crate knows how to read
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::default();
        registry.register(Box::new(AutopliusExtractor::new()?));
        registry.register(Box::new(SkelbiuExtractor::new()?));
        registry.register(Box::new(AruodasExtractor::new()?));
        Ok(registry)
    }

    /// Add an extractor, replacing any previous one for the same source
    pub fn register(&mut self, extractor: Box<dyn ListingExtractor>) {
        self.extractors.insert(extractor.source_name(), extractor);
    }

    pub fn get(&self, source_name: &str) -> Option<&dyn ListingExtractor> {
        self.extractors.get(source_name).map(|e| e.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_knows_all_sites() {
        let registry = ExtractorRegistry::builtin().unwrap();
        for name in ["autoplius", "skelbiu", "aruodas"] {
            assert_eq!(registry.get(name).unwrap().source_name(), name);
        }
        assert!(registry.get("ebay").is_none());
    }
}
