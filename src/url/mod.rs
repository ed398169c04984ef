//! URL handling module for Webdex
//!
//! This module provides URL normalization (absolute resolution and fragment
//! stripping) and the link filter that guards the frontier.

mod filter;
mod normalize;

// Re-export main functions
pub use filter::{compile_patterns, LinkFilter};
pub use normalize::{normalize_url, resolve_link};
