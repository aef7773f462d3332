use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use tracing::{debug, trace, warn};

use crate::error::StoreError;
use crate::multimap::{LinkedSetMultimap, ListMultimap};
use crate::types::{RuleOutput, Tag, TagState};

/// Accumulates the [`RuleOutput`]s of one rule-engine execution session.
///
/// Outputs are split into two partitions when they are stored:
///
/// - the **success partition** holds outputs whose conditions all held. It keeps
///   an insertion-ordered *set* per tag type, so storing an equal output twice
///   under the same tag type has no effect.
/// - the **failure partition** holds outputs with condition failures. It keeps
///   an insertion-ordered *list* per tag type, duplicates included.
///
/// An output never moves between partitions.
///
/// The store does no locking. Mutation takes `&mut self`, so a single session
/// owns it; callers that share a store between threads wrap it in a `Mutex` or
/// `RwLock` themselves.
///
/// # Example
///
/// ```
/// use tagstore::{OutputStore, RuleOutput, Tag, TagState};
///
/// let mut store = OutputStore::new();
/// store
///     .store(RuleOutput::success(
///         "detect_cpu",
///         "cpu",
///         vec![Tag::new("cpu", 93_i64, TagState::Parked)],
///     ))
///     .unwrap();
///
/// assert_eq!(store.available_tag_types(), vec!["cpu"]);
/// assert_eq!(store.map_tags(TagState::Parked).get("cpu").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct OutputStore {
    outputs: LinkedSetMultimap<String, RuleOutput>,
    condition_failures: ListMultimap<String, RuleOutput>,
}

impl OutputStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one output in the partition selected by
    /// [`has_condition_failures()`](RuleOutput::has_condition_failures),
    /// keyed by its embedded tag type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if the output has an empty
    /// embedded tag type. Neither partition is modified in that case.
    pub fn store(&mut self, output: RuleOutput) -> Result<(), StoreError> {
        if output.embedded_tag_type().is_empty() {
            warn!(
                rule = output.rule_name(),
                "rejecting rule output without tag type"
            );
            return Err(StoreError::InvalidArgument {
                rule: output.rule_name().to_owned(),
            });
        }

        let tag_type = output.embedded_tag_type().to_owned();
        if output.has_condition_failures() {
            debug!(
                tag_type = %tag_type,
                rule = output.rule_name(),
                failures = output.condition_failures().len(),
                "storing rule output with condition failures"
            );
            self.condition_failures.put(tag_type, output);
        } else {
            let rule = output.rule_name().to_owned();
            let inserted = self.outputs.put(tag_type.clone(), output);
            debug!(
                tag_type = %tag_type,
                rule = %rule,
                inserted,
                "storing rule output"
            );
        }
        Ok(())
    }

    /// Store every output in iteration order.
    ///
    /// This is not transactional: it stops at the first rejected output and the
    /// outputs stored before it stay stored.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] reported by [`store()`](Self::store).
    pub fn store_all(
        &mut self,
        outputs: impl IntoIterator<Item = RuleOutput>,
    ) -> Result<(), StoreError> {
        for output in outputs {
            self.store(output)?;
        }
        Ok(())
    }

    /// Distinct tag types of the success partition, in first-insertion order.
    ///
    /// Tag types that only ever appeared on failed outputs are not included.
    #[must_use]
    pub fn available_tag_types(&self) -> Vec<&str> {
        self.outputs.keys().map(String::as_str).collect()
    }

    /// The failure partition: every output with condition failures, per tag
    /// type, in insertion order with duplicates.
    #[must_use]
    pub fn outputs_with_condition_failures(&self) -> &ListMultimap<String, RuleOutput> {
        &self.condition_failures
    }

    /// The success partition: deduplicated outputs per tag type, in insertion
    /// order.
    #[must_use]
    pub fn outputs(&self) -> &LinkedSetMultimap<String, RuleOutput> {
        &self.outputs
    }

    /// Collect the tags in `state` from every successful output that produced
    /// tags.
    ///
    /// Tags are keyed by their own type, which may differ from the embedded
    /// tag type of the output that produced them. Outputs are visited in
    /// success-partition order and tags in their stored order; duplicates are
    /// kept.
    #[must_use]
    pub fn map_tags(&self, state: TagState) -> ListMultimap<String, Tag> {
        let mut tags = ListMultimap::new();
        for output in self.outputs.values().filter(|o| o.has_result_tags()) {
            for tag in output.tags().iter().filter(|t| t.state() == state) {
                tags.put(tag.tag_type().to_owned(), tag.clone());
            }
        }
        trace!(state = %state, matched = tags.len(), "mapped tags");
        tags
    }

    /// Collect the successful outputs stored under any of `tag_types`.
    ///
    /// Tag types are visited from the most recently introduced to the least
    /// recently introduced, where "introduced" means the first time an output
    /// was stored under that type. For each matching tag type *all* of its
    /// outputs are returned, in insertion order. Returns an empty vector when
    /// nothing matches.
    #[must_use]
    pub fn find_latest_results_by_tag_type<Q, S>(
        &self,
        tag_types: &HashSet<Q, S>,
    ) -> Vec<&RuleOutput>
    where
        Q: Borrow<str> + Hash + Eq,
        S: BuildHasher,
    {
        let results: Vec<&RuleOutput> = self
            .outputs
            .groups()
            .rev()
            .filter(|(tag_type, _)| tag_types.contains(tag_type.as_str()))
            .flat_map(|(_, outputs)| outputs.iter())
            .collect();
        trace!(
            requested = tag_types.len(),
            found = results.len(),
            "found latest results by tag type"
        );
        results
    }

    /// Number of outputs in the success partition.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Number of outputs in the failure partition.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.condition_failures.len()
    }

    /// Whether both partitions are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty() && self.condition_failures.is_empty()
    }

    /// Empty both partitions. A cleared store behaves like a new one.
    pub fn clear(&mut self) {
        debug!(
            outputs = self.outputs.len(),
            condition_failures = self.condition_failures.len(),
            "clearing output store"
        );
        self.outputs.clear();
        self.condition_failures.clear();
    }
}

impl fmt::Display for OutputStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OutputStore({} outputs, {} condition failures, {} tag types)",
            self.outputs.len(),
            self.condition_failures.len(),
            self.outputs.key_count(),
        )
    }
}
