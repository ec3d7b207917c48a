pub mod changelog;
pub mod changelog_checker;
pub mod config;
pub mod document;
pub mod engine;
pub mod manifest;
pub mod reporter;
pub mod severity;
pub mod severity_config;

pub mod testing;
