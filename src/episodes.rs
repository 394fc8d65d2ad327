//! Episode feed reading and released-name extraction.
//!
//! The feed collaborator yields `{title, publish date}` pairs; the extractor
//! turns each title into a released game name by stripping episode-numbering
//! prefixes, common podcast suffixes, and finally applying a small manual
//! alias table for titles that never match the ranked list verbatim.

use std::time::Duration;

use regex::Regex;

/// One entry from the podcast feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    pub published: String,
}

/// Source of released episodes.
///
/// Implementations retry internally and degrade to an empty list on
/// persistent failure; the pipeline halts on an empty list, so feed errors
/// never need to propagate as typed errors.
pub trait EpisodeFeed {
    /// Human-readable identifier for error reporting.
    fn describe(&self) -> String;

    fn episodes(&self) -> Vec<Episode>;
}

/// Titles that never fuzzy-match their ranked-list counterpart.
/// Maps cleaned episode title -> ranked-list name.
const NAME_ALIASES: &[(&str, &str)] = &[("Spelunky HD", "Spelunky")];

/// Turns episode titles into released game names.
pub struct NameExtractor {
    prefix: Regex,
    suffix: Regex,
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl NameExtractor {
    pub fn new() -> Self {
        NameExtractor {
            // "Episode 12:" / "Ep. 3" style numbering prefixes.
            prefix: Regex::new(r"(?i)^(Episode\s*\d+:?\s*|Ep\.?\s*\d+:?\s*)")
                .expect("prefix pattern is valid"),
            suffix: Regex::new(r"(?i)\s*-\s*(Review|Discussion|Podcast).*$")
                .expect("suffix pattern is valid"),
        }
    }

    /// Derive the released game name from one episode title.
    ///
    /// Returns `None` when nothing is left after cleanup.
    pub fn extract(&self, title: &str) -> Option<String> {
        let cleaned = self.prefix.replace(title, "");
        let cleaned = self.suffix.replace(&cleaned, "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }

        for (alias, canonical) in NAME_ALIASES {
            if cleaned == *alias {
                log::debug!("applied name mapping: '{cleaned}' -> '{canonical}'");
                return Some((*canonical).to_string());
            }
        }
        Some(cleaned.to_string())
    }

    /// Extract released names from all episodes, preserving feed order.
    pub fn extract_all(&self, episodes: &[Episode]) -> Vec<String> {
        let mut names = Vec::with_capacity(episodes.len());
        for episode in episodes {
            if let Some(name) = self.extract(&episode.title) {
                log::debug!(
                    "episode '{}' -> game '{}' (published: {})",
                    episode.title,
                    name,
                    episode.published
                );
                names.push(name);
            }
        }
        names
    }
}

/// RSS feed reader over HTTP.
///
/// Retries a bounded number of times with a fixed delay, then reports an
/// empty episode list.
pub struct RssFeed {
    url: String,
    agent: ureq::Agent,
    max_attempts: u32,
    retry_delay: Duration,
}

impl RssFeed {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .build();
        RssFeed {
            url: url.into(),
            agent,
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }

    /// Override the retry schedule (tests use a zero delay).
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    fn fetch_once(&self) -> Result<Vec<Episode>, String> {
        let response = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|error| format!("request failed: {error}"))?;
        let body = response
            .into_string()
            .map_err(|error| format!("failed to read response: {error}"))?;
        parse_rss(&body).map_err(|error| format!("failed to parse feed XML: {error}"))
    }
}

impl EpisodeFeed for RssFeed {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn episodes(&self) -> Vec<Episode> {
        for attempt in 1..=self.max_attempts {
            log::debug!(
                "fetching RSS feed {} (attempt {attempt}/{})",
                self.url,
                self.max_attempts
            );
            match self.fetch_once() {
                Ok(episodes) => {
                    log::info!("found {} episodes in RSS feed", episodes.len());
                    return episodes;
                }
                Err(message) if attempt < self.max_attempts => {
                    log::warn!("feed attempt {attempt} failed: {message}; retrying");
                    std::thread::sleep(self.retry_delay);
                }
                Err(message) => {
                    log::error!(
                        "error fetching RSS feed after {} attempts: {message}",
                        self.max_attempts
                    );
                }
            }
        }
        Vec::new()
    }
}

/// Parse `<item><title>/<pubDate>` pairs out of an RSS document.
///
/// Items without a title are skipped; a missing `pubDate` becomes "Unknown".
pub fn parse_rss(xml: &str) -> Result<Vec<Episode>, roxmltree::Error> {
    let document = roxmltree::Document::parse(xml)?;
    let mut episodes = Vec::new();

    for item in document
        .descendants()
        .filter(|node| node.has_tag_name("item"))
    {
        let title = item
            .children()
            .find(|node| node.has_tag_name("title"))
            .and_then(|node| node.text())
            .map(str::trim)
            .filter(|text| !text.is_empty());

        let Some(title) = title else { continue };

        let published = item
            .children()
            .find(|node| node.has_tag_name("pubDate"))
            .and_then(|node| node.text())
            .map(str::trim)
            .unwrap_or("Unknown")
            .to_string();

        episodes.push(Episode {
            title: title.to_string(),
            published,
        });
    }

    Ok(episodes)
}
