pub mod config;
pub mod error;
pub mod knowledge;
pub mod types;

pub use config::PrepwiseConfig;
pub use error::{PrepwiseError, Result};
pub use knowledge::{FemaGuide, GoBagLists, KnowledgeBase};
pub use types::*;
