// testing utilities for generating changelogs and project directories

pub mod changelog_builder;

pub use changelog_builder::{TestChangelog, TestProject, TestRelease};
