//! Gmail Atom feed client
//!
//! One HTTP GET per watched account index against the per-account inbox
//! feed. Uses synchronous HTTP (ureq) to be executor-agnostic; the poller
//! fans requests out on scoped threads.

use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Why an unread count could not be produced for an account.
///
/// All variants are soft failures: the poller logs them and omits the
/// account from the cycle's map, it never surfaces them further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// HTTP 401: the browser session is not signed in to this account
    #[error("account {0} is not authenticated")]
    NotAuthenticated(u32),
    /// HTTP 404: the account index does not exist
    #[error("account {0} does not exist")]
    UnknownAccount(u32),
    #[error("request for account {0} failed with status {1}")]
    Status(u32, u16),
    #[error("request for account {0} failed: {1}")]
    Transport(u32, String),
    #[error("feed for account {0} is unparsable: {1}")]
    Malformed(u32, String),
}

/// Source of per-account unread counts
pub trait UnreadSource: Send + Sync {
    /// Fetch the unread count for one account index.
    ///
    /// `Ok(0)` is a confirmed zero; any error means "unknown this cycle".
    fn unread_count(&self, index: u32) -> Result<u64, FeedError>;
}

/// The subset of the Gmail Atom feed we read
#[derive(Debug, Deserialize)]
struct AtomFeed {
    fullcount: Option<u64>,
}

/// [`UnreadSource`] backed by the Gmail per-account Atom feed
pub struct GmailFeed;

impl GmailFeed {
    const BASE_URL: &'static str = "https://mail.google.com/mail";

    pub fn new() -> Self {
        Self
    }

    fn feed_url(index: u32) -> String {
        format!("{}/u/{}/feed/atom", Self::BASE_URL, index)
    }
}

impl Default for GmailFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl UnreadSource for GmailFeed {
    fn unread_count(&self, index: u32) -> Result<u64, FeedError> {
        let url = Self::feed_url(index);
        debug!("Fetching unread feed for account {}", index);

        let mut response = match ureq::get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(401)) => return Err(FeedError::NotAuthenticated(index)),
            Err(ureq::Error::StatusCode(404)) => return Err(FeedError::UnknownAccount(index)),
            Err(ureq::Error::StatusCode(code)) => return Err(FeedError::Status(index, code)),
            Err(e) => return Err(FeedError::Transport(index, e.to_string())),
        };

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FeedError::Transport(index, e.to_string()))?;

        parse_unread_count(&body).map_err(|e| FeedError::Malformed(index, e))
    }
}

/// Extract the unread count from an Atom feed document.
///
/// A well-formed feed without a `fullcount` element is a confirmed zero,
/// distinct from a parse failure (count unknown).
fn parse_unread_count(xml: &str) -> Result<u64, String> {
    let feed: AtomFeed = quick_xml::de::from_str(xml).map_err(|e| e.to_string())?;
    Ok(feed.fullcount.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_WITH_COUNT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed version="0.3" xmlns="http://purl.org/atom/ns#">
  <title>Gmail - Inbox for someone@gmail.com</title>
  <tagline>New messages in your Gmail Inbox</tagline>
  <fullcount>5</fullcount>
  <modified>2024-01-01T00:00:00Z</modified>
</feed>"#;

    const FEED_WITHOUT_COUNT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed version="0.3" xmlns="http://purl.org/atom/ns#">
  <title>Gmail - Inbox</title>
</feed>"#;

    #[test]
    fn test_parse_fullcount() {
        assert_eq!(parse_unread_count(FEED_WITH_COUNT).unwrap(), 5);
    }

    #[test]
    fn test_missing_fullcount_is_confirmed_zero() {
        assert_eq!(parse_unread_count(FEED_WITHOUT_COUNT).unwrap(), 0);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_unread_count("not xml at all").is_err());
    }

    #[test]
    fn test_non_numeric_fullcount_is_an_error() {
        let xml = r#"<feed><fullcount>many</fullcount></feed>"#;
        assert!(parse_unread_count(xml).is_err());
    }

    #[test]
    fn test_feed_url() {
        assert_eq!(
            GmailFeed::feed_url(2),
            "https://mail.google.com/mail/u/2/feed/atom"
        );
    }
}
