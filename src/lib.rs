//! Read Pulumi stack outputs from Pulumi Cloud deployment exports
//!
//! The crate fetches `GET /api/stacks/{org}/{project}/{stack}/export`, finds
//! the stack's root `pulumi:pulumi:Stack` resource in the exported resource
//! graph and returns its outputs as a string map along with the export
//! version.

pub mod config;
pub mod error;
pub mod provider;
pub mod pulumi;

pub use error::{FetchError, Result};
