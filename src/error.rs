use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tierforge operations.
///
/// Per-item image resolution never surfaces here: a game whose image cannot
/// be obtained degrades to a placeholder inside the resolver. Only the
/// pipeline-halting conditions and genuine I/O failures become errors.
#[derive(Debug, Error)]
pub enum TierforgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed at {url} yielded no episodes")]
    EmptyFeed { url: String },

    #[error("No game names could be extracted from {episode_count} episode title(s)")]
    NoGameNames { episode_count: usize },

    #[error("Failed to fetch ranked-list document from {origin}: {message}")]
    DocumentFetch { origin: String, message: String },

    #[error("Ranked-list document from {origin} contained no parseable tiers")]
    NoTiersParsed { origin: String },

    #[error(
        "No ranked games matched any released episode \
         ({candidate_count} candidate(s) against {reference_count} reference(s))"
    )]
    NoMatches {
        candidate_count: usize,
        reference_count: usize,
    },

    #[error("Failed to read credentials file {}: {source}", path.display())]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output image to {}: {message}", path.display())]
    ImageWrite { path: PathBuf, message: String },

    #[error("Failed to write debug artifact {}: {source}", path.display())]
    DebugWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
