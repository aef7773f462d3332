//! An in-memory store for the outputs of a rule-engine execution session.
//!
//! [`OutputStore`] partitions [`RuleOutput`]s into successful outputs and
//! outputs with condition failures, and answers queries over them: available
//! tag types, tags by lifecycle state, and outputs by most recently introduced
//! tag type.

mod error;
mod multimap;
mod store;
mod types;

pub use error::StoreError;
pub use multimap::{LinkedSetMultimap, ListMultimap};
pub use store::OutputStore;
pub use types::{ConditionFailure, RuleOutput, Tag, TagState, Value};
