//! The fixed list of upstream sources.
//!
//! Built once at startup from configuration and shared read-only by every
//! request. Insertion order follows the config file.

use indexmap::IndexMap;
use std::sync::Arc;
use url::Url;

use crate::config::SourceConfig;

#[derive(Clone, Debug)]
pub struct Sources {
    sources: Arc<IndexMap<String, Url>>,
}

impl Sources {
    /// Assumes names were already validated as unique; a later duplicate
    /// replaces the earlier URL.
    pub fn new(configs: Vec<SourceConfig>) -> Self {
        let sources = configs
            .into_iter()
            .map(|config| (config.name, config.url))
            .collect();

        Self {
            sources: Arc::new(sources),
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Url)> {
        self.sources.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.sources.keys()
    }
}
