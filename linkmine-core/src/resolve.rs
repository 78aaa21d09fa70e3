use crate::error::{IssueCallback, KeywordError};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// Hosts already resolved to a domain keyword during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainMemo {
    hosts: HashSet<String>,
}

impl DomainMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `host` as processed. Returns false if it already was.
    pub fn insert(&mut self, host: impl Into<String>) -> bool {
        self.hosts.insert(host.into())
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn clear(&mut self) {
        self.hosts.clear();
    }
}

/// Compare `host` and `main_domain` from their last character backwards and
/// return the leading part of `host` that is not covered by the shared suffix,
/// including the first mismatching character.
///
/// Returns `None` when the scan stops at index 0 of `host` or runs past it:
/// `host` is identical to, or a suffix of, `main_domain`, or only its very
/// first character differs.
///
/// ```
/// use linkmine_core::resolve::longest_suffix_mismatch;
///
/// assert_eq!(
///     longest_suffix_mismatch("news.sina.com.cn", "sina.com.cn"),
///     Some("news.".to_string())
/// );
/// assert_eq!(longest_suffix_mismatch("sina.com.cn", "sina.com.cn"), None);
/// ```
pub fn longest_suffix_mismatch(host: &str, main_domain: &str) -> Option<String> {
    let host_len = host.chars().count();
    let common = host
        .chars()
        .rev()
        .zip(main_domain.chars().rev())
        .take_while(|(h, m)| h == m)
        .count();

    // Stop index in `host` is host_len - 1 - common; nothing is kept at 0 or below
    if host_len <= common + 1 {
        return None;
    }

    let keep = host_len - common;
    let end = host
        .char_indices()
        .nth(keep)
        .map(|(offset, _)| offset)
        .unwrap_or(host.len());
    Some(host[..end].to_string())
}

/// Whole-string match of an optional `+`/`-` followed by zero or more ASCII
/// digits. The empty string and a lone sign both count as numeric.
pub fn is_numeric(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    digits.chars().all(|c| c.is_ascii_digit())
}

/// Split a URL path into keyword candidates: percent-decoded, trimmed,
/// non-empty, non-numeric segments.
pub fn path_keywords(path: &str) -> impl Iterator<Item = String> {
    path.split('/').filter_map(|raw| {
        let decoded = decode_segment(raw);
        let segment = decoded.trim();
        (!segment.is_empty() && !is_numeric(segment)).then(|| segment.to_string())
    })
}

// Segments that are not valid UTF-8 once decoded are kept as written
fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Derives keyword candidates from a set of URLs relative to a main domain.
#[derive(Default)]
pub struct DomainKeywordResolver {
    issue_callback: Option<IssueCallback>,
}

impl DomainKeywordResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue_callback(mut self, callback: IssueCallback) -> Self {
        self.issue_callback = Some(callback);
        self
    }

    /// Collect domain keywords and path keywords for every URL in `urls`.
    ///
    /// A host's domain keyword is computed only the first time the host is
    /// seen in `memo`. URLs that fail to parse are reported and skipped.
    pub fn resolve<I, S>(&self, main_domain: &str, urls: I, memo: &mut DomainMemo) -> HashSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords = HashSet::new();

        for url_str in urls {
            let url_str = url_str.as_ref();
            let url = match Url::parse(url_str) {
                Ok(url) => url,
                Err(source) => {
                    self.report(KeywordError::MalformedUrl {
                        url: url_str.to_string(),
                        source,
                    });
                    continue;
                }
            };

            if let Some(host) = url.host_str()
                && memo.insert(host)
                && let Some(domain_keyword) = longest_suffix_mismatch(host, main_domain)
            {
                debug!("Domain keyword '{}' from host {}", domain_keyword, host);
                keywords.insert(domain_keyword);
            }

            keywords.extend(path_keywords(url.path()));
        }

        keywords
    }

    fn report(&self, issue: KeywordError) {
        warn!("{}", issue);
        self.notify(&issue);
    }

    pub(crate) fn notify(&self, issue: &KeywordError) {
        if let Some(ref callback) = self.issue_callback {
            callback(issue);
        }
    }
}
