//! Pipe obstacles: a top/bottom pair around a randomized vertical gap that
//! scrolls left until it leaves the screen.

pub mod logic;
pub mod types;

pub use types::*;
