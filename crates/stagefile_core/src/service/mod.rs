//! Filing services.
//!
//! # Responsibility
//! - Orchestrate store operations into the filing use-cases: stage
//!   access, folder resolution, and the stage-transition watcher.
//! - Keep host layers decoupled from store details.

pub mod folder_service;
pub mod frontmatter_service;
pub mod stage_watcher;
