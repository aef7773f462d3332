use std::fmt;

use super::tag::Tag;

/// A precondition of a rule that did not hold during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionFailure {
    condition_name: String,
    hint: String,
}

impl ConditionFailure {
    pub fn new(condition_name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            condition_name: condition_name.into(),
            hint: hint.into(),
        }
    }

    #[must_use]
    pub fn condition_name(&self) -> &str {
        &self.condition_name
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }
}

impl fmt::Display for ConditionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.condition_name, self.hint)
    }
}

/// The result of evaluating one rule.
///
/// An output is indexed under its embedded tag type. It either carries
/// condition failures, in which case its tags are not meaningful, or it carries
/// the tags the rule produced. Both facts are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleOutput {
    rule_name: String,
    embedded_tag_type: String,
    condition_failures: Vec<ConditionFailure>,
    tags: Vec<Tag>,
}

impl RuleOutput {
    pub fn new(
        rule_name: impl Into<String>,
        embedded_tag_type: impl Into<String>,
        condition_failures: Vec<ConditionFailure>,
        tags: Vec<Tag>,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            embedded_tag_type: embedded_tag_type.into(),
            condition_failures,
            tags,
        }
    }

    /// An output whose conditions all held.
    pub fn success(
        rule_name: impl Into<String>,
        embedded_tag_type: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Self {
        Self::new(rule_name, embedded_tag_type, Vec::new(), tags)
    }

    /// An output of a rule that could not fire because conditions failed.
    pub fn failed(
        rule_name: impl Into<String>,
        embedded_tag_type: impl Into<String>,
        condition_failures: Vec<ConditionFailure>,
    ) -> Self {
        Self::new(rule_name, embedded_tag_type, condition_failures, Vec::new())
    }

    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// The tag type this output is indexed under.
    #[must_use]
    pub fn embedded_tag_type(&self) -> &str {
        &self.embedded_tag_type
    }

    #[must_use]
    pub fn condition_failures(&self) -> &[ConditionFailure] {
        &self.condition_failures
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn has_condition_failures(&self) -> bool {
        !self.condition_failures.is_empty()
    }

    #[must_use]
    pub fn has_result_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}

impl fmt::Display for RuleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.rule_name, self.embedded_tag_type)?;
        if self.has_condition_failures() {
            write!(f, ", {} condition failures", self.condition_failures.len())
        } else {
            write!(f, ", {} tags", self.tags.len())
        }
    }
}
