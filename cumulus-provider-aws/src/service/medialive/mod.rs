//! AWS Elemental MediaLive
//!
//! Every MediaLive resource is managed through the Cloud Control API.

pub mod channel;
pub mod input;
pub mod input_security_group;
pub mod multiplex;
pub mod multiplex_program;
mod service_package_gen;

pub use service_package_gen::{MediaLivePackage, service_package};
