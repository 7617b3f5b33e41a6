//! Static site → adapter registry

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::SiteKey;
use crate::sites::{
    CodeChefAdapter, CodeforcesAdapter, HackerRankAdapter, SiteAdapter, UnsupportedAdapter,
};

/// Explicit mapping from each site to the adapter that fills its slot.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<SiteKey, Arc<dyn SiteAdapter>>,
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AdapterRegistry")
            .field("sites", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry covering every supported site with its production adapter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CodeChefAdapter::new()));
        registry.register(Arc::new(CodeforcesAdapter::new()));
        registry.register(Arc::new(HackerRankAdapter::new()));
        for site in [SiteKey::Spoj, SiteKey::HackerEarth, SiteKey::Uva] {
            registry.register(Arc::new(UnsupportedAdapter::new(site)));
        }
        registry
    }

    /// Register an adapter under the site it reports, returning any adapter
    /// it replaced.
    pub fn register(&mut self, adapter: Arc<dyn SiteAdapter>) -> Option<Arc<dyn SiteAdapter>> {
        self.adapters.insert(adapter.site(), adapter)
    }

    pub fn get(&self, site: SiteKey) -> Option<Arc<dyn SiteAdapter>> {
        self.adapters.get(&site).cloned()
    }

    pub fn sites(&self) -> impl Iterator<Item = SiteKey> + '_ {
        self.adapters.keys().copied()
    }

    /// Ensure every site in `sites` has an adapter.
    pub fn validate(&self, sites: &[SiteKey]) -> Result<()> {
        let missing: Vec<&str> = sites
            .iter()
            .filter(|site| !self.adapters.contains_key(*site))
            .map(|site| site.name())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "No adapter registered for: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_supported_site() {
        let registry = AdapterRegistry::with_defaults();
        assert!(registry.validate(&SiteKey::ALL).is_ok());
        assert_eq!(registry.sites().collect::<Vec<_>>(), {
            let mut all = SiteKey::ALL.to_vec();
            all.sort();
            all
        });
        for site in SiteKey::ALL {
            assert_eq!(registry.get(site).map(|adapter| adapter.site()), Some(site));
        }
    }

    #[test]
    fn validate_names_missing_sites() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(CodeChefAdapter::new()));

        let error = registry
            .validate(&[SiteKey::CodeChef, SiteKey::Codeforces, SiteKey::Uva])
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Configuration error: No adapter registered for: codeforces, uva"
        );
    }

    #[test]
    fn register_replaces_existing_adapter() {
        let mut registry = AdapterRegistry::with_defaults();
        let replaced = registry.register(Arc::new(CodeChefAdapter::with_base_url("https://mirror.test")));
        assert!(replaced.is_some());
    }
}
