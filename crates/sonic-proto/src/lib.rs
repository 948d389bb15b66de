//! Shared data model and state for SonicVerse: tracks, collections, the
//! catalog store, session state, configuration and the error taxonomy.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod platform;
pub mod protocol;
pub mod session;
pub mod state;
