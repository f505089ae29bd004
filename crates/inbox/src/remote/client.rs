//! Mail API HTTP client
//!
//! Fetches message pages and bodies from the paginated mail API.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Duration;
use ureq::Agent;
use url::Url;

use super::api::{BodyResponse, ListResponse};
use super::normalize::normalize_email;
use super::source::MailSource;
use crate::error::NetworkError;
use crate::models::{MessageId, MessageSummary};

/// HTTP client for the mail API
pub struct MailApiClient {
    agent: Agent,
    base_url: Url,
}

impl MailApiClient {
    /// Default API endpoint
    pub const DEFAULT_BASE_URL: &'static str = "https://flipkart-email-mock.now.sh/";

    /// Create a client for `base_url`
    ///
    /// `timeout` bounds each whole request; `None` waits indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid mail API URL: {}", base_url))?;

        let config = Agent::config_builder().timeout_global(timeout).build();
        let agent = Agent::new_with_config(config);

        info!("Mail API client targeting {}", base_url);
        Ok(Self { agent, base_url })
    }

    /// URL of the list endpoint for `page`
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    /// URL of the detail endpoint for `id`
    pub fn body_url(&self, id: &MessageId) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("id", id.as_str());
        url
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &Url) -> Result<T, NetworkError> {
        let mut response = self.agent.get(url.as_str()).call().map_err(classify)?;
        response.body_mut().read_json::<T>().map_err(classify)
    }
}

impl MailSource for MailApiClient {
    fn fetch_page(&self, page: u32) -> Result<Vec<MessageSummary>, NetworkError> {
        let url = self.page_url(page);
        debug!("GET {}", url);

        let list: ListResponse = self.get_json(&url)?;
        let summaries: Vec<MessageSummary> = list.list.into_iter().map(normalize_email).collect();

        debug!(
            "Page {} returned {} messages (total {:?})",
            page,
            summaries.len(),
            list.total
        );
        Ok(summaries)
    }

    fn fetch_body(&self, id: &MessageId) -> Result<String, NetworkError> {
        let url = self.body_url(id);
        debug!("GET {}", url);

        let detail: BodyResponse = self.get_json(&url)?;
        Ok(detail.body)
    }
}

/// Sort a ureq failure into the engine's error kinds
fn classify(err: ureq::Error) -> NetworkError {
    match err {
        ureq::Error::StatusCode(code) => NetworkError::Status(code),
        ureq::Error::Json(e) => NetworkError::Decode(e.to_string()),
        other => NetworkError::Transport(other.to_string()),
    }
}
