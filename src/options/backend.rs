use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Backend", inline)]
#[serde(default)]
/// Where the clustering service lives and how long to wait for it.
pub struct BackendOptions {
    /// Scheme, host and port of the service, without a trailing slash.
    #[schemars(title = "Base URL")]
    pub base_url: String,
    /// Path of the dataset generation endpoint (`GET`).
    #[schemars(title = "Generate Path")]
    pub generate_path: String,
    /// Path of the k-means endpoint (`POST`).
    #[schemars(title = "Run Path")]
    pub run_path: String,
    /// Whole-request timeout in milliseconds.
    #[schemars(title = "Timeout (ms)", range(min = 100, max = 120_000))]
    pub timeout_ms: u64,
}

impl BackendOptions {
    /// Full URL of the generate endpoint.
    #[must_use]
    pub fn generate_url(&self) -> String {
        join_url(&self.base_url, &self.generate_path)
    }

    /// Full URL of the run endpoint.
    #[must_use]
    pub fn run_url(&self) -> String {
        join_url(&self.base_url, &self.run_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_owned(),
            generate_path: "/api/generate_data".to_owned(),
            run_path: "/api/run_kmeans".to_owned(),
            timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_doubled_slashes() {
        let opts = BackendOptions {
            base_url: "http://localhost:8080/".to_owned(),
            ..BackendOptions::default()
        };
        assert_eq!(
            opts.generate_url(),
            "http://localhost:8080/api/generate_data"
        );
        assert_eq!(opts.run_url(), "http://localhost:8080/api/run_kmeans");
    }
}
