//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use lookbook_core::Lookbook;

use crate::config::Config;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Photo catalog service shared by every request
    pub lookbook: Arc<Lookbook>,
    /// Maximum accepted photo size in bytes
    pub max_file_size: usize,
}

impl AppState {
    pub fn new(lookbook: Lookbook, config: &Config) -> Self {
        Self {
            lookbook: Arc::new(lookbook),
            max_file_size: config.max_file_size(),
        }
    }
}
