//! Jira story bridge.
//!
//! Connects to a Jira site with an account email and API token, lists
//! Story issues, fetches single stories, and renders their ADF descriptions
//! and acceptance criteria as plain text.

pub mod adf;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod form;
pub mod jira;
pub mod models;
pub mod remote;
pub mod render;
