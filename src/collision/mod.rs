//! Pixel-exact collision testing between sprite masks.

pub mod mask;

pub use mask::Mask;
