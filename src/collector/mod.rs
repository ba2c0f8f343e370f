// src/collector/mod.rs
// =============================================================================
// This module finds the external references of a page.
//
// Submodules:
// - classify: the internal/external rule and per-pass deduplication
// - links: HTML parsing and the three selector passes
// =============================================================================

mod classify;
mod links;

pub use links::external_references;
