//! Service package names

pub const MACIE: &str = "macie";
pub const MEDIALIVE: &str = "medialive";
