//! Ranked-list document sources and parsing.
//!
//! The document is plain text; lines of the form `<letter> Tier: a, b, c`
//! (keyword matched case-insensitively) populate the ranked list and every
//! other line is ignored. The source may be a local file or an HTTP URL,
//! optionally authorized with a bearer token read from a credentials file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

use crate::error::TierforgeError;
use crate::tier::{RankedList, Tier};

/// Source of the raw ranked-list document text.
pub trait DocumentSource {
    /// Human-readable identifier for error reporting.
    fn describe(&self) -> String;

    fn fetch_text(&self) -> Result<String, TierforgeError>;
}

/// Ranked-list document on the local filesystem.
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileDocument { path: path.into() }
    }
}

impl DocumentSource for FileDocument {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_text(&self) -> Result<String, TierforgeError> {
        fs::read_to_string(&self.path).map_err(|error| TierforgeError::DocumentFetch {
            origin: self.describe(),
            message: error.to_string(),
        })
    }
}

/// Ranked-list document behind an HTTP(S) URL.
pub struct HttpDocument {
    url: String,
    bearer_token: Option<String>,
    agent: ureq::Agent,
}

impl HttpDocument {
    pub fn new(url: impl Into<String>, bearer_token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .build();
        HttpDocument {
            url: url.into(),
            bearer_token,
            agent,
        }
    }
}

impl DocumentSource for HttpDocument {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch_text(&self) -> Result<String, TierforgeError> {
        let mut request = self.agent.get(&self.url);
        if let Some(token) = &self.bearer_token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call().map_err(|error| TierforgeError::DocumentFetch {
            origin: self.describe(),
            message: error.to_string(),
        })?;
        response
            .into_string()
            .map_err(|error| TierforgeError::DocumentFetch {
                origin: self.describe(),
                message: error.to_string(),
            })
    }
}

/// Pick a document source for a CLI argument: URLs go over HTTP, anything
/// else is treated as a local path.
pub fn source_for(
    location: &str,
    credentials: Option<&Path>,
) -> Result<Box<dyn DocumentSource>, TierforgeError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let token = match credentials {
            Some(path) => Some(
                fs::read_to_string(path)
                    .map_err(|source| TierforgeError::CredentialsRead {
                        path: path.to_path_buf(),
                        source,
                    })?
                    .trim()
                    .to_string(),
            ),
            None => None,
        };
        Ok(Box::new(HttpDocument::new(location, token)))
    } else {
        Ok(Box::new(FileDocument::new(location)))
    }
}

/// Parser for `<letter> Tier: <comma-separated names>` lines.
pub struct TierListParser {
    line: Regex,
}

impl Default for TierListParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TierListParser {
    pub fn new() -> Self {
        TierListParser {
            line: Regex::new(r"(?i)([A-Z])\s*Tier:\s*([^\n\r]+)").expect("tier pattern is valid"),
        }
    }

    /// Parse the ranked list out of raw document text.
    ///
    /// Letters outside the S–F enumeration are logged and skipped. A later
    /// line for the same tier replaces the earlier one.
    pub fn parse(&self, content: &str) -> RankedList {
        let mut tiers = RankedList::new();

        for capture in self.line.captures_iter(content) {
            let letter = capture[1].chars().next().expect("single-letter group");
            let Some(tier) = Tier::from_letter(letter) else {
                log::warn!("ignoring unknown tier letter '{letter}' in ranked-list document");
                continue;
            };

            let games: Vec<String> = capture[2]
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();

            if games.is_empty() {
                continue;
            }
            log::debug!("{tier} Tier: {}", games.join(", "));
            tiers.insert(tier, games);
        }

        tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::total_games;

    #[test]
    fn parses_tier_lines_and_ignores_noise() {
        let parser = TierListParser::new();
        let content = "\
Intro paragraph about the ranking.\n\
S Tier: Slay the Spire, Balatro\n\
Some commentary in between.\n\
a tier: Hades , Dead Cells\n\
F Tier: Gonner\n";

        let tiers = parser.parse(content);
        assert_eq!(
            tiers.get(&Tier::S).unwrap(),
            &vec!["Slay the Spire".to_string(), "Balatro".to_string()]
        );
        // Keyword and letter are case-insensitive; names keep their casing.
        assert_eq!(
            tiers.get(&Tier::A).unwrap(),
            &vec!["Hades".to_string(), "Dead Cells".to_string()]
        );
        assert_eq!(total_games(&tiers), 5);
    }

    #[test]
    fn skips_letters_outside_the_enumeration() {
        let parser = TierListParser::new();
        let tiers = parser.parse("G Tier: Mystery Game\nB Tier: FTL\n");
        assert_eq!(tiers.len(), 1);
        assert!(tiers.contains_key(&Tier::B));
    }

    #[test]
    fn later_duplicate_tier_line_replaces_earlier() {
        let parser = TierListParser::new();
        let tiers = parser.parse("C Tier: Old Entry\nC Tier: New Entry\n");
        assert_eq!(tiers.get(&Tier::C).unwrap(), &vec!["New Entry".to_string()]);
    }

    #[test]
    fn drops_empty_names_from_comma_lists() {
        let parser = TierListParser::new();
        let tiers = parser.parse("D Tier: Noita, , Downwell,\n");
        assert_eq!(
            tiers.get(&Tier::D).unwrap(),
            &vec!["Noita".to_string(), "Downwell".to_string()]
        );
    }

    #[test]
    fn empty_document_parses_to_empty_list() {
        let parser = TierListParser::new();
        assert!(parser.parse("").is_empty());
        assert!(parser.parse("nothing relevant here").is_empty());
    }

    #[test]
    fn file_source_reports_missing_file() {
        let source = FileDocument::new("definitely/not/here.txt");
        let error = source.fetch_text().unwrap_err();
        assert!(matches!(error, TierforgeError::DocumentFetch { .. }));
    }

    #[test]
    fn source_for_treats_non_urls_as_paths() {
        let source = source_for("tierlist.txt", None).expect("local source");
        assert_eq!(source.describe(), "tierlist.txt");
        let source = source_for("https://example.com/doc", None).expect("http source");
        assert_eq!(source.describe(), "https://example.com/doc");
    }
}
