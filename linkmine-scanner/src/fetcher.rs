use crate::error::{Result, ScanError};
use crate::result::AnchorLink;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Downloads a page and pulls out the anchor links inside a CSS selection.
pub struct AnchorFetcher {
    timeout_secs: u64,
    user_agent: String,
}

impl AnchorFetcher {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            user_agent: format!("linkmine/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(client)
    }

    /// Fetch `page_url` and return every element matched by `selector` as
    /// an (anchor text, absolute href) pair.
    pub async fn fetch_links(&self, page_url: &str, selector: &str) -> Result<Vec<AnchorLink>> {
        Url::parse(page_url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", page_url, e)))?;

        info!("Fetching {} (selector: {})", page_url, selector);
        let response = self.client()?.get(page_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: page_url.to_string(),
                status: status.as_u16(),
            });
        }

        // Redirects change the base that relative hrefs resolve against
        let final_url = response.url().to_string();
        let body = response.text().await?;

        let links = extract_anchor_links(&body, &final_url, selector)?;
        info!("Found {} links on {}", links.len(), final_url);
        Ok(links)
    }
}

impl Default for AnchorFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Select elements from `html` and turn each into an [`AnchorLink`].
///
/// Text is whitespace-collapsed and trimmed. The `href` attribute is
/// resolved against `page_url` with its fragment dropped; an element
/// without a usable `href` gets an empty one.
pub fn extract_anchor_links(html: &str, page_url: &str, selector: &str) -> Result<Vec<AnchorLink>> {
    let parsed_selector = Selector::parse(selector).map_err(|e| ScanError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;
    let base_url = Url::parse(page_url).ok();
    let document = Html::parse_document(html);

    let mut links = Vec::new();
    for element in document.select(&parsed_selector) {
        let raw_text: String = element.text().collect();
        let text = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");

        let href = element
            .value()
            .attr("href")
            .and_then(|href| resolve_href(base_url.as_ref(), href))
            .unwrap_or_default();

        debug!("Found link: '{}' -> {}", text, href);
        links.push(AnchorLink::new(text, href));
    }

    Ok(links)
}

fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut resolved = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    resolved.set_fragment(None);

    Some(resolved.to_string())
}
