//! # Scrawl Common Library
//!
//! Shared code for the Scrawl writing application including:
//! - Destination data model (projects, folders, text files, versions, submissions)
//! - Database initialization and settings accessors
//! - Configuration loading and root folder resolution
//! - Utility functions

pub mod config;
pub mod db;
pub mod error;
pub mod human_time;
pub mod models;
pub mod uuid_utils;

pub use error::{Error, Result};
