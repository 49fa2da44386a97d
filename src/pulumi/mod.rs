//! Pulumi Cloud API interaction module
//!
//! This module reads a stack's deployment export from the Pulumi Cloud REST
//! API and extracts the outputs of the stack's root resource.
//!
//! # Module Structure
//!
//! - [`auth`] - Access token resolution
//! - [`client`] - Main Pulumi client for fetching stack outputs
//! - [`export`] - Deployment export decoding and root resource lookup
//! - [`http`] - HTTP utilities for REST API calls
//! - [`stack`] - Stack identifiers and URN synthesis
//!
//! # Example
//!
//! ```ignore
//! use pulumi_stack_outputs::pulumi::{AccessToken, PulumiClient, StackIdentifier};
//!
//! async fn example() -> pulumi_stack_outputs::Result<()> {
//!     let client = PulumiClient::new(AccessToken::new("pul-...")?)?;
//!     let id = StackIdentifier::new("acme", "infra", "prod")?;
//!     let outputs = client.fetch_stack_outputs(&id).await?;
//!     println!("{:?}", outputs.outputs.get("url"));
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod export;
pub mod http;
pub mod stack;

pub use auth::AccessToken;
pub use client::PulumiClient;
pub use export::StackOutputs;
pub use stack::StackIdentifier;
