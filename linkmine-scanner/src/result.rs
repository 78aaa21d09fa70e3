use serde::{Deserialize, Serialize};

/// A hyperlink as seen on a fetched page: its visible text and its
/// absolute target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorLink {
    pub text: String,
    pub href: String,
}

impl AnchorLink {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }
}

impl From<(String, String)> for AnchorLink {
    fn from((text, href): (String, String)) -> Self {
        Self { text, href }
    }
}

impl From<(&str, &str)> for AnchorLink {
    fn from((text, href): (&str, &str)) -> Self {
        Self::new(text, href)
    }
}
