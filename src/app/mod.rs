//! Application orchestration — state, frame loop plumbing, and input
//! handling.

pub mod event;
pub mod handler;
pub mod scroll_host;
pub mod state;
pub mod texture_runtime;
