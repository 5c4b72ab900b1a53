//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Catalog refresh: Invalidates and repopulates the cache at a configured interval

mod refresh;

pub use refresh::spawn_refresh_task;
