//! Library crate for user-directory.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - Error and result types (`error`)
//! - User records as served by the remote endpoint (`model`)
//! - Name search and sorting over loaded users (`search`)
//! - Paged fetching from the user service (`source`)
//! - Opening links in the system browser (`sys`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-directory` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod error;
pub mod logging;
pub mod model;
pub mod search;
pub mod source;
pub mod sys;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
