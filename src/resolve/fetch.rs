//! Remote image retrieval by identifier.

use std::io::Read;
use std::time::Duration;

/// Fetch collaborator returning raw image bytes for a numeric identifier.
pub trait ImageFetch {
    fn fetch(&self, id: u64) -> Result<Vec<u8>, String>;
}

/// Steam CDN header-image client.
pub struct SteamCdnFetch {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for SteamCdnFetch {
    fn default() -> Self {
        Self::new("https://cdn.akamai.steamstatic.com/steam/apps")
    }
}

impl SteamCdnFetch {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .build();
        SteamCdnFetch {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl ImageFetch for SteamCdnFetch {
    fn fetch(&self, id: u64) -> Result<Vec<u8>, String> {
        let url = format!("{}/{id}/header.jpg", self.base_url);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|error| format!("header request failed: {error}"))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|error| format!("failed to read header bytes: {error}"))?;
        Ok(bytes)
    }
}
