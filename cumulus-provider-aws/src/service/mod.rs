//! Resource handlers grouped by AWS service

pub mod macie;
pub mod medialive;
