pub mod config;
pub mod error;
pub mod fetch;
pub mod git;
pub mod log;
pub mod render;
pub mod sections;
pub mod store;
pub mod tasks;
pub mod util;

pub use config::WikiConfig;
pub use error::{Error, Result};
pub use render::Renderer;
pub use store::PageStore;
