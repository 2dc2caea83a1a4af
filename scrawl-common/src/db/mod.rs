//! Database access for the Scrawl store

pub mod init;
pub mod settings;

pub use init::*;
