//! Cumulus Core
//!
//! Host-side contract for resource plugins: resources and state, attribute
//! schemas, the provider trait, and the service package registration tables.

pub mod differ;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod service;
