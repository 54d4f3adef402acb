//! Core engine – gallery model, scroll progress, card motion, and the stage
//! that ties them together.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The host
//! scroll container is reached only through [`progress::ScrollHost`].

pub mod damp;
pub mod gallery;
pub mod guard;
pub mod motion;
pub mod navigation;
pub mod progress;
pub mod remap;
pub mod slideshow;
pub mod snap;
pub mod stage;
pub mod texture;
