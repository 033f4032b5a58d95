//! Integration test suite for gitwiki.
//!
//! These tests drive the full render pipeline against real temporary git
//! repositories and in-memory stores.
//!
//! # Test Categories
//!
//! - `render_pipeline`: End-to-end page rendering
//! - `includes`: INCLUDE resolution, recursion and cycles
//! - `git_store`: Page storage in a git repository
//!
//! # CI Compatibility
//!
//! Remote includes are served by an in-memory fetcher; no test touches
//! the network.

mod fixtures;

mod git_store;
mod includes;
mod render_pipeline;
