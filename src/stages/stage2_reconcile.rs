use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::Verdict;

/// Result of verdict reconciliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileResult {
    /// At most one verdict per utterance id
    pub verdicts: Vec<Verdict>,
    /// Number of entries overwritten by a later entry for the same id
    pub duplicates_collapsed: usize,
    /// Number of entries dropped for lacking an utterance id
    pub dropped_without_id: usize,
}

/// Collapse duplicate verdicts so each utterance id appears at most once.
///
/// The last entry for an id wins. Output keeps the position where each id
/// first appeared. Entries with a missing or blank id are dropped.
pub fn reconcile(verdicts: Vec<Verdict>) -> ReconcileResult {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut result = ReconcileResult::default();

    for verdict in verdicts {
        if !verdict.has_id() {
            result.dropped_without_id += 1;
            continue;
        }

        match positions.get(&verdict.utterance_id).copied() {
            Some(pos) => {
                debug!(
                    "Verdict for {} overwritten ({} -> {})",
                    verdict.utterance_id,
                    result.verdicts[pos].verdict.as_str(),
                    verdict.verdict.as_str()
                );
                result.verdicts[pos] = verdict;
                result.duplicates_collapsed += 1;
            }
            None => {
                positions.insert(verdict.utterance_id.clone(), result.verdicts.len());
                result.verdicts.push(verdict);
            }
        }
    }

    if result.duplicates_collapsed > 0 || result.dropped_without_id > 0 {
        info!(
            "Reconcile: {} verdicts kept, {} duplicates collapsed, {} without id dropped",
            result.verdicts.len(),
            result.duplicates_collapsed,
            result.dropped_without_id
        );
    }

    result
}

/// Look up the verdict for an utterance in a reconciled list
pub fn verdict_for<'a>(verdicts: &'a [Verdict], utterance_id: &str) -> Option<&'a Verdict> {
    verdicts.iter().find(|v| v.utterance_id == utterance_id)
}
