//! Shared application state handed to every axum handler.
//!
//! `AppState` is `Arc<RelayContext>` — same shape as `gglib_axum::state`'s
//! `AppState = Arc<AxumContext>` — so cloning it per-request is one atomic
//! increment, not a deep copy.

use std::sync::Arc;

use crate::bootstrap::RelayContext;

pub type AppState = Arc<RelayContext>;
