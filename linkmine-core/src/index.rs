use linkmine_scanner::AnchorLink;
use serde::Serialize;
use std::collections::hash_map::Iter;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Anchor text to the set of absolute URLs that carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnchorLinkIndex {
    links: HashMap<String, HashSet<String>>,
}

impl AnchorLinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `url` under `anchor_text`. Returns false if the pair was already present.
    pub fn insert(&mut self, anchor_text: impl Into<String>, url: impl Into<String>) -> bool {
        self.links
            .entry(anchor_text.into())
            .or_default()
            .insert(url.into())
    }

    pub fn get(&self, anchor_text: &str) -> Option<&HashSet<String>> {
        self.links.get(anchor_text)
    }

    pub fn contains(&self, anchor_text: &str) -> bool {
        self.links.contains_key(anchor_text)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Total number of distinct (anchor, url) pairs
    pub fn url_count(&self) -> usize {
        self.links.values().map(HashSet::len).sum()
    }

    pub fn iter(&self) -> Iter<'_, String, HashSet<String>> {
        self.links.iter()
    }
}

impl<'a> IntoIterator for &'a AnchorLinkIndex {
    type Item = (&'a String, &'a HashSet<String>);
    type IntoIter = Iter<'a, String, HashSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

/// Groups fetched links by their trimmed anchor text.
pub struct LinkIndexBuilder;

impl LinkIndexBuilder {
    /// Build a fresh index from `links`.
    ///
    /// Anchor text is trimmed and links whose text ends up empty are
    /// dropped. Hrefs are taken as-is.
    pub fn build<I, L>(main_page_url: &str, links: I) -> AnchorLinkIndex
    where
        I: IntoIterator<Item = L>,
        L: Into<AnchorLink>,
    {
        let mut index = AnchorLinkIndex::new();
        let mut skipped = 0usize;

        for link in links {
            let AnchorLink { text, href } = link.into();
            let text = text.trim();
            if text.is_empty() {
                skipped += 1;
                continue;
            }
            index.insert(text, href);
        }

        debug!(
            "Indexed {} anchor texts ({} urls) from {}, skipped {} without text",
            index.len(),
            index.url_count(),
            main_page_url,
            skipped
        );
        index
    }
}
