mod rule_output;
mod tag;
mod value;

pub use rule_output::{ConditionFailure, RuleOutput};
pub use tag::{Tag, TagState};
pub use value::Value;
