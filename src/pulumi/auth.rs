//! Pulumi Authentication
//!
//! Resolves the Pulumi Cloud access token from the command line, the
//! `PULUMI_ACCESS_TOKEN` environment variable, or the config file.

use crate::error::{FetchError, Result};
use std::fmt;

/// Environment variable the Pulumi CLI itself reads the token from
pub const TOKEN_ENV_VAR: &str = "PULUMI_ACCESS_TOKEN";

/// Pulumi Cloud access token
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token, rejecting empty or whitespace-only values
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(FetchError::MissingToken);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Pick the first non-empty token in precedence order
pub fn resolve_token<I>(candidates: I) -> Result<AccessToken>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| AccessToken::new(candidate).ok())
        .ok_or(FetchError::MissingToken)
}

/// Read the token from `PULUMI_ACCESS_TOKEN`
pub fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV_VAR).ok()
}
