//! HTTP implementation of [`Backend`] on a blocking `ureq` agent.

use std::time::Duration;

use ureq::Agent;

use super::{decode_generate, decode_run, Backend, BackendError, RunRequest};
use crate::model::{ClusterCount, Sample, Snapshot};
use crate::options::BackendOptions;

/// Talks to the clustering service over HTTP.
pub struct HttpBackend {
    agent: Agent,
    generate_url: String,
    run_url: String,
}

impl HttpBackend {
    /// Backend for the endpoints and timeout in `options`.
    #[must_use]
    pub fn new(options: &BackendOptions) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(options.timeout_ms)))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            generate_url: options.generate_url(),
            run_url: options.run_url(),
        }
    }
}

fn map_err(e: ureq::Error) -> BackendError {
    match e {
        ureq::Error::StatusCode(code) => BackendError::Status(code),
        other => BackendError::Transport(other.to_string()),
    }
}

impl Backend for HttpBackend {
    fn generate_data(&self) -> Result<Vec<Sample>, BackendError> {
        log::debug!("GET {}", self.generate_url);
        let body = self
            .agent
            .get(&self.generate_url)
            .call()
            .map_err(map_err)?
            .into_body()
            .read_to_string()
            .map_err(map_err)?;
        decode_generate(&body)
    }

    fn run_kmeans(&self, k: ClusterCount) -> Result<Vec<Snapshot>, BackendError> {
        log::debug!("POST {} (k = {k})", self.run_url);
        let body = self
            .agent
            .post(&self.run_url)
            .send_json(RunRequest { k })
            .map_err(map_err)?
            .into_body()
            .read_to_string()
            .map_err(map_err)?;
        decode_run(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_come_from_options() {
        let backend = HttpBackend::new(&BackendOptions {
            base_url: "http://localhost:8080/".to_owned(),
            ..BackendOptions::default()
        });
        assert_eq!(backend.generate_url, "http://localhost:8080/api/generate_data");
        assert_eq!(backend.run_url, "http://localhost:8080/api/run_kmeans");
    }

    #[test]
    fn status_errors_keep_the_code() {
        assert_eq!(map_err(ureq::Error::StatusCode(503)), BackendError::Status(503));
    }
}
