//! Cumulus AWS Provider
//!
//! Resource plugins for Amazon Macie (classic) and AWS Elemental MediaLive.
//!
//! ## Module Structure
//!
//! - `provider` - AwsProvider, the host-facing entry point
//! - `conns` - Connection object handed to every handler
//! - `config` - Provider configuration
//! - `service` - Resource handlers and service packages, one module per AWS service
//! - `cloudcontrol` - Cloud Control API client and generic handler
//! - `types` - Attribute types shared by AWS schemas

pub mod cloudcontrol;
pub mod config;
pub mod conns;
pub mod names;
pub mod provider;
pub mod service;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types
pub use config::{ConfigError, ProviderConfig};
pub use conns::AwsClient;
pub use provider::{AwsProvider, service_packages};
