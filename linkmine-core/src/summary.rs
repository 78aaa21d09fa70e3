use crate::aggregate::KeywordIndex;
use crate::index::AnchorLinkIndex;
use serde::Serialize;

/// Counters for one invocation, across every page analysed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub pages: usize,
    pub failed_pages: usize,
    pub anchors: usize,
    pub urls: usize,
    pub keywords: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successfully analysed page.
    pub fn record_page(&mut self, links: &AnchorLinkIndex) {
        self.pages += 1;
        self.urls += links.url_count();
    }

    pub fn record_failure(&mut self) {
        self.failed_pages += 1;
    }

    /// Take anchor and keyword totals from the merged index.
    pub fn finish(&mut self, keywords: &KeywordIndex) {
        self.anchors = keywords.len();
        self.keywords = keywords.keyword_count();
    }
}

/// Render a human-readable listing of `summary` and `keywords`.
pub fn generate_summary_report(summary: &RunSummary, keywords: &KeywordIndex) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages analysed: {}\n", summary.pages));
    if summary.failed_pages > 0 {
        report.push_str(&format!("  Pages failed: {}\n", summary.failed_pages));
    }
    report.push_str(&format!("  Links indexed: {}\n", summary.urls));
    report.push_str(&format!("  Anchor texts: {}\n", summary.anchors));
    report.push_str(&format!("  Keywords: {}\n", summary.keywords));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let mut anchors: Vec<_> = keywords.iter().collect();
    anchors.sort_by(|a, b| a.0.cmp(b.0));

    for (anchor_text, anchor_keywords) in anchors {
        let mut sorted: Vec<&String> = anchor_keywords.iter().collect();
        sorted.sort();

        report.push_str(&format!("## {}\n", anchor_text));
        if sorted.is_empty() {
            report.push_str("  (no keywords)\n");
        } else {
            for keyword in sorted {
                report.push_str(&format!("  {}\n", keyword));
            }
        }
        report.push('\n');
    }

    report
}
