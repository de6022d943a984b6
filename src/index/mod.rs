//! Package index lookups.
//!
//! Queries the PyPI simple index (PEP 691 JSON) for an exact-name match.
//! The match is deliberately strict: PyPI serves its own normalized project
//! name in the response, and anything that differs from the requested name
//! by even case or punctuation is rejected. Installing an unrelated but
//! similarly-named package is worse than installing nothing.
//!
//! Lookups are best-effort. Network errors, timeouts, and malformed
//! responses all degrade to "not found" and never fail the caller.

use serde::Deserialize;
use std::time::Duration;

/// Default index base URL (PEP 503/691 simple API).
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/simple";

/// Media type for PEP 691 JSON responses.
const SIMPLE_JSON: &str = "application/vnd.pypi.simple.v1+json";

/// A PEP 691 project page. Only the canonical name is needed here.
#[derive(Debug, Deserialize)]
struct ProjectPage {
    name: String,
}

/// Client for exact-name lookups against a package index.
///
/// # Example
///
/// ```no_run
/// use autovenv::index::IndexClient;
///
/// let client = IndexClient::new();
/// if client.search("requests") {
///     println!("requests exists on PyPI");
/// }
/// ```
pub struct IndexClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl IndexClient {
    /// Create a client against the default index.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_INDEX_URL)
    }

    /// Create a client against a custom index base URL (no trailing slash).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Check whether `name` exists in the index as an exact match.
    ///
    /// Any failure along the way is logged and treated as not-found.
    pub fn search(&self, name: &str) -> bool {
        let url = format!("{}/{}/", self.base_url, name);

        let response = match self.client.get(&url).header("Accept", SIMPLE_JSON).send() {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("index lookup for '{}' failed: {}", name, e);
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("index returned HTTP {} for '{}'", response.status(), name);
            return false;
        }

        match response.json::<ProjectPage>() {
            Ok(page) => {
                let found = page.name == name;
                if !found {
                    tracing::debug!(
                        "index name '{}' does not exactly match requested '{}', rejecting",
                        page.name,
                        name
                    );
                }
                found
            }
            Err(e) => {
                tracing::debug!("malformed index response for '{}': {}", name, e);
                false
            }
        }
    }
}

impl Default for IndexClient {
    fn default() -> Self {
        Self::new()
    }
}
