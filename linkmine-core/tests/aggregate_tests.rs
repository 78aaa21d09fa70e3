// Tests for keyword aggregation across anchor texts

use linkmine_core::aggregate::{KeywordAggregator, KeywordIndex, main_domain};
use linkmine_core::error::{IssueCallback, KeywordError};
use linkmine_core::index::LinkIndexBuilder;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

const PAGE: &str = "http://news.sina.com.cn/guide/";

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn collecting_callback() -> (IssueCallback, Arc<Mutex<Vec<String>>>) {
    let issues: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let issues_clone = issues.clone();
    let callback: IssueCallback = Arc::new(move |issue: &KeywordError| {
        issues_clone.lock().unwrap().push(issue.to_string());
    });
    (callback, issues)
}

// ============================================================================
// Main Domain Tests
// ============================================================================

#[test]
fn test_main_domain_from_page_url() {
    assert_eq!(main_domain(PAGE).unwrap(), "news.sina.com.cn");
    assert_eq!(main_domain("https://example.com:8080/a?b=c").unwrap(), "example.com");
}

#[test]
fn test_main_domain_malformed() {
    assert!(matches!(
        main_domain("not a url"),
        Err(KeywordError::MalformedUrl { .. })
    ));
}

#[test]
fn test_main_domain_without_host() {
    assert!(matches!(
        main_domain("mailto:editor@sina.com.cn"),
        Err(KeywordError::MissingHost(_))
    ));
}

// ============================================================================
// Aggregation Tests
// ============================================================================

#[test]
fn test_aggregate_end_to_end() {
    let index = LinkIndexBuilder::build(
        PAGE,
        vec![("World", "http://english.sina.com/world/2024/abc")],
    );

    let keywords = KeywordAggregator::new().aggregate(PAGE, &index);

    // "english.sina.com" shares no trailing characters with "news.sina.com.cn"
    assert_eq!(
        keywords.get("World").unwrap(),
        &set(&["english.sina.com", "world", "abc"])
    );
}

#[test]
fn test_aggregate_every_anchor_present() {
    let index = LinkIndexBuilder::build(
        PAGE,
        vec![
            ("China", "http://news.sina.com.cn/china/"),
            ("Home", "http://news.sina.com.cn/"),
            ("Blogs", "http://blog.sina.com.cn/lm/"),
        ],
    );

    let keywords = KeywordAggregator::new().aggregate(PAGE, &index);

    assert_eq!(keywords.len(), 3);
    assert_eq!(keywords.get("China").unwrap(), &set(&["china"]));
    // Anchors with nothing to extract still get an (empty) entry
    assert!(keywords.get("Home").unwrap().is_empty());
    assert_eq!(keywords.get("Blogs").unwrap(), &set(&["blog", "lm"]));
}

#[test]
fn test_aggregate_shares_memo_across_anchors() {
    let index = LinkIndexBuilder::build(
        PAGE,
        vec![
            ("NBA", "http://sports.sina.com.cn/nba/"),
            ("CBA", "http://sports.sina.com.cn/cba/"),
        ],
    );

    let keywords = KeywordAggregator::new().aggregate(PAGE, &index);

    let with_domain_keyword = keywords
        .iter()
        .filter(|(_, kws)| kws.contains("sport"))
        .count();
    assert_eq!(with_domain_keyword, 1);
    assert!(keywords.get("NBA").unwrap().contains("nba"));
    assert!(keywords.get("CBA").unwrap().contains("cba"));
}

#[test]
fn test_aggregate_fresh_memo_per_run() {
    let index = LinkIndexBuilder::build(PAGE, vec![("NBA", "http://sports.sina.com.cn/nba/")]);
    let aggregator = KeywordAggregator::new();

    let first = aggregator.aggregate(PAGE, &index);
    let second = aggregator.aggregate(PAGE, &index);

    assert_eq!(first, second);
    assert!(second.get("NBA").unwrap().contains("sport"));
}

#[test]
fn test_aggregate_tolerates_bad_links() {
    let (callback, issues) = collecting_callback();
    let index = LinkIndexBuilder::build(
        PAGE,
        vec![
            ("World", "http://news.sina.com.cn/world/"),
            ("World", "not a url"),
            ("Broken", ""),
        ],
    );

    let keywords = KeywordAggregator::with_issue_callback(callback).aggregate(PAGE, &index);

    assert_eq!(keywords.get("World").unwrap(), &set(&["world"]));
    assert!(keywords.get("Broken").unwrap().is_empty());
    assert_eq!(issues.lock().unwrap().len(), 2);
}

#[test]
fn test_aggregate_malformed_page_url_yields_nothing() {
    let (callback, issues) = collecting_callback();
    let index = LinkIndexBuilder::build(PAGE, vec![("World", "http://news.sina.com.cn/world/")]);

    let keywords = KeywordAggregator::with_issue_callback(callback).aggregate("::bad::", &index);

    assert!(keywords.is_empty());
    let issues = issues.lock().unwrap();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].starts_with("Malformed URL"));
}

#[test]
fn test_aggregate_page_url_without_host_yields_nothing() {
    let index = LinkIndexBuilder::build(PAGE, vec![("World", "http://news.sina.com.cn/world/")]);

    let keywords = KeywordAggregator::new().aggregate("mailto:someone", &index);

    assert!(keywords.is_empty());
}

// ============================================================================
// KeywordIndex Tests
// ============================================================================

#[test]
fn test_keyword_index_merge_unions() {
    let mut index = KeywordIndex::new();
    index.merge("World", vec!["world".to_string(), "news".to_string()]);
    index.merge("World", vec!["world".to_string(), "abc".to_string()]);

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("World").unwrap(), &set(&["world", "news", "abc"]));
    assert_eq!(index.keyword_count(), 3);
}

#[test]
fn test_keyword_index_extend() {
    let mut first = KeywordIndex::new();
    first.merge("World", vec!["world".to_string()]);

    let mut second = KeywordIndex::new();
    second.merge("World", vec!["global".to_string()]);
    second.merge("China", vec!["china".to_string()]);

    first.extend(second);

    assert_eq!(first.len(), 2);
    assert_eq!(first.get("World").unwrap(), &set(&["world", "global"]));
}

#[test]
fn test_keyword_index_json_is_sorted() {
    let mut index = KeywordIndex::new();
    index.merge("World", vec!["world".to_string(), "abc".to_string()]);
    index.merge("China", Vec::new());

    let json = serde_json::to_string(&index).unwrap();

    assert_eq!(json, r#"{"China":[],"World":["abc","world"]}"#);
}
