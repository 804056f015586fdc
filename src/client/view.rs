use chrono::DateTime;
use url::Url;

use crate::models::Link;

/// Display-ready fields derived from a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub id: String,
    pub url: String,
    pub title: String,
    pub domain: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub added_on: String,
}

impl From<&Link> for LinkView {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            url: link.url.clone(),
            title: link.title.clone(),
            domain: domain(&link.url),
            notes: link.notes.clone().filter(|n| !n.is_empty()),
            tags: link.tags.clone(),
            added_on: date_only(&link.created_at),
        }
    }
}

/// Host name without a leading `www.`; the raw text when it is not a URL.
pub fn domain(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
        })
        .unwrap_or_else(|| raw.to_string())
}

fn date_only(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
