//! HTTP endpoint handlers for the inspector.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/`: Landing page
//! - `/threads`: Grouped thread snapshot as plain text
//! - `/threads/groups`: Group and state counts as JSON
//! - `/health`: Health check endpoint

pub mod health;
pub mod root;
pub mod threads;

// Re-export handlers
pub use health::health_handler;
pub use root::root_handler;
pub use threads::{groups_handler, threads_handler};
