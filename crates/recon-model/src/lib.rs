pub mod catalog;
pub mod error;
pub mod matching;

pub use catalog::{CREATED_ID_PREFIX, Catalog, Category, Record};
pub use error::{ModelError, Result};
pub use matching::{MatchEntry, MatchSetConfig, MatchedPair};
