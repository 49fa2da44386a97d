//! Pulumi Client
//!
//! Main client for reading stack exports, combining the access token
//! and HTTP functionality.

use super::auth::AccessToken;
use super::export::{parse_export, StackOutputs};
use super::http::PulumiHttpClient;
use super::stack::StackIdentifier;
use crate::error::{FetchError, Result};
use url::Url;

/// Base URL of the hosted Pulumi Cloud API
pub const DEFAULT_API_URL: &str = "https://api.pulumi.com";

/// Main Pulumi client
#[derive(Clone)]
pub struct PulumiClient {
    http: PulumiHttpClient,
    token: AccessToken,
    api_url: Url,
}

impl PulumiClient {
    /// Create a client for the hosted Pulumi Cloud
    pub fn new(token: AccessToken) -> Result<Self> {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Create a client for a self-hosted or mocked API endpoint
    pub fn with_api_url(token: AccessToken, api_url: &str) -> Result<Self> {
        let mut api_url = Url::parse(api_url).map_err(|e| FetchError::RequestConstruction {
            message: format!("invalid API URL {:?}: {}", api_url, e),
        })?;

        // Url::join replaces the last segment unless the base ends with '/'
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            http: PulumiHttpClient::new()?,
            token,
            api_url,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Build the export endpoint URL for a stack
    pub fn stack_export_url(&self, id: &StackIdentifier) -> Result<Url> {
        self.api_url
            .join(&id.export_path())
            .map_err(|e| FetchError::RequestConstruction {
                message: format!("invalid export URL for {}: {}", id, e),
            })
    }

    /// Fetch a stack's export and extract its root resource outputs
    pub async fn fetch_stack_outputs(&self, id: &StackIdentifier) -> Result<StackOutputs> {
        let url = self.stack_export_url(id)?;
        let body = self.http.get(url.as_str(), self.token.as_str()).await?;

        let outputs = parse_export(&body, id)?;
        tracing::info!(
            "Read {} outputs from {} (export version {})",
            outputs.outputs.len(),
            id,
            outputs.version
        );

        Ok(outputs)
    }
}
