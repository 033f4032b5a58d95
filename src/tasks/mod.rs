//! Task directives and INCLUDE resolution.
//!
//! This module holds the task grammar and the aggregator that expands
//! INCLUDE tasks into task lists gathered from other pages or URLs.

pub mod include;
pub mod task;

pub use include::{Aggregator, IncludeError, Origin, TaskList};
pub use task::{Task, TaskKind};
