use crate::error::{IssueCallback, KeywordError, Result};
use crate::index::AnchorLinkIndex;
use crate::resolve::{DomainKeywordResolver, DomainMemo};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::hash_map::Iter;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{error, info};
use url::Url;

/// Anchor text to the deduplicated keywords derived from its links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    keywords: HashMap<String, HashSet<String>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `keywords` into the set held for `anchor_text`.
    pub fn merge<I>(&mut self, anchor_text: impl Into<String>, keywords: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.keywords
            .entry(anchor_text.into())
            .or_default()
            .extend(keywords);
    }

    /// Union every entry of `other` into this index.
    pub fn extend(&mut self, other: KeywordIndex) {
        for (anchor_text, keywords) in other.keywords {
            self.merge(anchor_text, keywords);
        }
    }

    pub fn get(&self, anchor_text: &str) -> Option<&HashSet<String>> {
        self.keywords.get(anchor_text)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Total number of keywords across all anchor texts
    pub fn keyword_count(&self) -> usize {
        self.keywords.values().map(HashSet::len).sum()
    }

    pub fn iter(&self) -> Iter<'_, String, HashSet<String>> {
        self.keywords.iter()
    }
}

impl<'a> IntoIterator for &'a KeywordIndex {
    type Item = (&'a String, &'a HashSet<String>);
    type IntoIter = Iter<'a, String, HashSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}

// Sorted so that JSON output is stable between runs
impl Serialize for KeywordIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut anchors: Vec<_> = self.keywords.iter().collect();
        anchors.sort_by(|a, b| a.0.cmp(b.0));

        let mut map = serializer.serialize_map(Some(anchors.len()))?;
        for (anchor_text, keywords) in anchors {
            let sorted: BTreeSet<&String> = keywords.iter().collect();
            map.serialize_entry(anchor_text, &sorted)?;
        }
        map.end()
    }
}

/// Host of the page under analysis.
pub fn main_domain(page_url: &str) -> Result<String> {
    let url = Url::parse(page_url).map_err(|source| KeywordError::MalformedUrl {
        url: page_url.to_string(),
        source,
    })?;

    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| KeywordError::MissingHost(page_url.to_string()))
}

/// Turns an [`AnchorLinkIndex`] into a [`KeywordIndex`] for one page.
#[derive(Default)]
pub struct KeywordAggregator {
    resolver: DomainKeywordResolver,
}

impl KeywordAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: DomainKeywordResolver) -> Self {
        Self { resolver }
    }

    pub fn with_issue_callback(callback: IssueCallback) -> Self {
        Self::with_resolver(DomainKeywordResolver::new().with_issue_callback(callback))
    }

    /// Resolve keywords for every anchor text in `index`.
    ///
    /// All anchor texts share one [`DomainMemo`], so a host linked under
    /// several anchors yields its domain keyword only once. If the main page
    /// URL has no usable host the result is empty.
    pub fn aggregate(&self, main_page_url: &str, index: &AnchorLinkIndex) -> KeywordIndex {
        let mut keyword_index = KeywordIndex::new();

        let main_domain = match main_domain(main_page_url) {
            Ok(domain) => domain,
            Err(e) => {
                error!("Skipping keyword extraction for {}: {}", main_page_url, e);
                self.resolver.notify(&e);
                return keyword_index;
            }
        };

        let mut memo = DomainMemo::new();
        for (anchor_text, urls) in index {
            let keywords = self.resolver.resolve(&main_domain, urls, &mut memo);
            keyword_index.merge(anchor_text.clone(), keywords);
        }

        info!(
            "Extracted {} keywords for {} anchor texts on {} ({} hosts seen)",
            keyword_index.keyword_count(),
            keyword_index.len(),
            main_domain,
            memo.len()
        );
        keyword_index
    }
}
