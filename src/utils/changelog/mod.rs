// changelog structure and rules

pub mod config;
pub mod links;
pub mod parser;
pub mod types;
pub mod validator;

pub use config::ChangelogConfig;
pub use links::RepositoryLinks;
pub use parser::{parse_changelog, parse_release_heading};
pub use types::{
    Changelog, ChangelogCategory, ChangelogEntry, ChangelogVersion, LinkDefinition, ReleaseDate,
    ReleaseVersion,
};
pub use validator::validate_changelog;
