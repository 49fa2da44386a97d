//! Provider surface
//!
//! Declares the `pulumi_stack_outputs` data source the way a declarative
//! configuration tool sees it, and implements its read on top of
//! [`PulumiClient`].

use crate::error::Result;
use crate::pulumi::auth::{resolve_token, token_from_env, TOKEN_ENV_VAR};
use crate::pulumi::client::{PulumiClient, DEFAULT_API_URL};
use crate::pulumi::stack::StackIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name the data source is registered under
pub const DATA_SOURCE_NAME: &str = "pulumi_stack_outputs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    StringMap,
}

/// One attribute of a provider or data source schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_default: Option<&'static str>,
}

impl Attribute {
    pub fn required_string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: AttributeType::String,
            description,
            required: true,
            computed: false,
            sensitive: false,
            env_default: None,
        }
    }

    pub fn computed(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            computed: true,
            sensitive: false,
            env_default: None,
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_env_default(mut self, var: &'static str) -> Self {
        self.env_default = Some(var);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    pub provider: Vec<Attribute>,
    pub data_sources: BTreeMap<&'static str, Vec<Attribute>>,
}

/// Schema of the provider block and its single data source
pub fn schema() -> ProviderSchema {
    let provider = vec![
        Attribute::required_string("token", "The access token for Pulumi's cloud")
            .sensitive()
            .with_env_default(TOKEN_ENV_VAR),
    ];

    let stack_outputs = vec![
        Attribute::required_string("organization", "organization name"),
        Attribute::required_string("project", "project name"),
        Attribute::required_string("stack", "stack name"),
        Attribute::computed("version", AttributeType::Int, "Version of Pulumi's API used"),
        Attribute::computed(
            "stack_outputs",
            AttributeType::StringMap,
            "Outputs for the Pulumi Stack",
        ),
    ];

    ProviderSchema {
        provider,
        data_sources: BTreeMap::from([(DATA_SOURCE_NAME, stack_outputs)]),
    }
}

/// Provider block configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Data source arguments
#[derive(Debug, Clone, Deserialize)]
pub struct StackOutputsArgs {
    pub organization: String,
    pub project: String,
    pub stack: String,
}

/// Data source state after a read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackOutputsState {
    pub id: String,
    pub organization: String,
    pub project: String,
    pub stack: String,
    pub version: i64,
    pub stack_outputs: BTreeMap<String, String>,
}

/// A configured provider
#[derive(Clone)]
pub struct Provider {
    client: PulumiClient,
}

impl Provider {
    /// Configure the provider, falling back to `PULUMI_ACCESS_TOKEN` for the token
    pub fn configure(config: ProviderConfig) -> Result<Self> {
        let token = resolve_token([config.token, token_from_env()])?;
        let api_url = config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);

        Ok(Self {
            client: PulumiClient::with_api_url(token, api_url)?,
        })
    }

    pub fn from_client(client: PulumiClient) -> Self {
        Self { client }
    }

    /// Read the `pulumi_stack_outputs` data source
    pub async fn read_stack_outputs(&self, args: StackOutputsArgs) -> Result<StackOutputsState> {
        let id = StackIdentifier::new(args.organization, args.project, args.stack)?;
        let outputs = self.client.fetch_stack_outputs(&id).await?;

        Ok(StackOutputsState {
            id: id.id(),
            organization: id.organization().to_string(),
            project: id.project().to_string(),
            stack: id.stack().to_string(),
            version: outputs.version,
            stack_outputs: outputs.outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::pulumi::AccessToken;

    #[test]
    fn test_schema_declares_data_source() {
        let schema = schema();
        let attrs = &schema.data_sources[DATA_SOURCE_NAME];

        let required: Vec<_> = attrs.iter().filter(|a| a.required).map(|a| a.name).collect();
        let computed: Vec<_> = attrs.iter().filter(|a| a.computed).map(|a| a.name).collect();
        assert_eq!(required, ["organization", "project", "stack"]);
        assert_eq!(computed, ["version", "stack_outputs"]);
    }

    #[test]
    fn test_schema_token_is_sensitive_with_env_default() {
        let schema = schema();
        let token = &schema.provider[0];
        assert_eq!(token.name, "token");
        assert!(token.sensitive);
        assert_eq!(token.env_default, Some(TOKEN_ENV_VAR));
    }

    #[test]
    fn test_schema_serializes_types() {
        let json = serde_json::to_value(schema()).unwrap();
        let attrs = &json["data_sources"][DATA_SOURCE_NAME];
        assert_eq!(attrs[3]["type"], "int");
        assert_eq!(attrs[4]["type"], "string_map");
        assert!(json["provider"][0].get("env_default").is_some());
        assert!(attrs[0].get("env_default").is_none());
    }

    #[test]
    fn test_configure_with_explicit_token() {
        let provider = Provider::configure(ProviderConfig {
            token: Some("pul-abc".into()),
            api_url: Some("http://127.0.0.1:9".into()),
        });
        assert!(provider.is_ok());
    }

    #[test]
    fn test_read_rejects_empty_stack_before_request() {
        let client =
            PulumiClient::with_api_url(AccessToken::new("pul-abc").unwrap(), "http://127.0.0.1:9").unwrap();
        let provider = Provider::from_client(client);

        let result = tokio_test::block_on(provider.read_stack_outputs(StackOutputsArgs {
            organization: "acme".into(),
            project: "infra".into(),
            stack: String::new(),
        }));
        assert!(matches!(result, Err(FetchError::InvalidIdentifier { .. })));
    }
}
