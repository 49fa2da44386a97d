//! Stack identifiers
//!
//! A stack is addressed by organization, project and stack name. The same
//! triple yields the durable `org/project/stack` ID, the export URL path and
//! the URN of the stack's root resource.

use crate::error::{FetchError, Result};
use std::fmt;

/// Fully qualified Pulumi stack name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackIdentifier {
    organization: String,
    project: String,
    stack: String,
}

impl StackIdentifier {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        stack: impl Into<String>,
    ) -> Result<Self> {
        let id = Self {
            organization: organization.into(),
            project: project.into(),
            stack: stack.into(),
        };

        for (field, value) in [
            ("organization", &id.organization),
            ("project", &id.project),
            ("stack", &id.stack),
        ] {
            if value.is_empty() {
                return Err(FetchError::InvalidIdentifier {
                    message: format!("{} must not be empty", field),
                });
            }
        }

        Ok(id)
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// The `org/project/stack` string used as the data source ID
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// URN of the root `pulumi:pulumi:Stack` resource in this stack's export
    pub fn stack_urn(&self) -> String {
        format!(
            "urn:pulumi:{stack}::{project}::pulumi:pulumi:Stack::{project}-{stack}",
            stack = self.stack,
            project = self.project,
        )
    }

    /// URL path of the export endpoint, with each component percent-encoded
    pub(crate) fn export_path(&self) -> String {
        format!(
            "api/stacks/{}/{}/{}/export",
            urlencoding::encode(&self.organization),
            urlencoding::encode(&self.project),
            urlencoding::encode(&self.stack),
        )
    }
}

impl fmt::Display for StackIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.organization, self.project, self.stack)
    }
}
