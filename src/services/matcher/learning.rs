//! Mapping learning protocol.
//!
//! When the engine leaves a label unresolved, the host asks the user for
//! a profile key, persists the mapping, then re-runs resolution for just
//! that label. Modeled as a per-label state machine so the host (an
//! extension content script, a test, another service) can drive prompts
//! however it likes; `learn_and_resolve` is the persist+re-resolve tail
//! as a single callable unit.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::database::mapping_repo;
use crate::database::models::FieldMapping;
use crate::types::errors::AppResult;

use super::engine;
use super::normalizer::normalize_label;
use super::session::ScanSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnState {
    Idle,
    AwaitingUserKey,
    Persisting,
    Reconciled,
    Skipped,
}

/// Whether a label should trigger a user prompt: it must be unresolved,
/// have no existing mapping (compared by mapping-lookup normalization),
/// and not already have been prompted or skipped in this scan pass.
pub fn should_prompt(
    session: &ScanSession,
    mappings: &[FieldMapping],
    resolved: &HashMap<String, String>,
    raw_label: &str,
) -> bool {
    if resolved.contains_key(raw_label) {
        return false;
    }
    if session.was_prompted(raw_label) || session.was_skipped(raw_label) {
        return false;
    }
    let normalized = normalize_label(raw_label);
    !mappings
        .iter()
        .any(|m| normalize_label(&m.form_label) == normalized)
}

/// Learning flow for one label within one scan pass.
#[derive(Debug)]
pub struct LabelLearning {
    raw_label: String,
    state: LearnState,
}

impl LabelLearning {
    /// Start learning for an unresolved label. Returns `None` when the
    /// label is not prompt-eligible; otherwise marks it prompted in the
    /// session and moves to `AwaitingUserKey`.
    pub fn begin(
        session: &mut ScanSession,
        mappings: &[FieldMapping],
        resolved: &HashMap<String, String>,
        raw_label: &str,
    ) -> Option<Self> {
        if !should_prompt(session, mappings, resolved, raw_label) {
            return None;
        }
        session.mark_prompted(raw_label);
        Some(Self {
            raw_label: raw_label.to_string(),
            state: LearnState::AwaitingUserKey,
        })
    }

    pub fn state(&self) -> LearnState {
        self.state
    }

    pub fn raw_label(&self) -> &str {
        &self.raw_label
    }

    /// User declined or supplied nothing. No store mutation; the label
    /// is not asked again this pass.
    pub fn skip(&mut self, session: &mut ScanSession) {
        session.mark_skipped(&self.raw_label);
        self.state = LearnState::Skipped;
    }

    /// User supplied a profile key: persist the mapping, then re-resolve
    /// just this label. An empty key is treated as a skip. On persist
    /// failure the label returns to `Idle` so it may be retried; nothing
    /// else in the pass is affected.
    pub async fn submit_key(
        &mut self,
        pool: &SqlitePool,
        user_id: &str,
        session: &mut ScanSession,
        chosen_key: &str,
    ) -> AppResult<Option<String>> {
        let chosen_key = chosen_key.trim();
        if chosen_key.is_empty() {
            self.skip(session);
            return Ok(None);
        }

        self.state = LearnState::Persisting;
        let value = match learn_and_resolve(pool, user_id, &self.raw_label, chosen_key).await {
            Ok(value) => value,
            Err(e) => {
                self.state = LearnState::Idle;
                return Err(e);
            }
        };

        self.state = LearnState::Reconciled;
        if let Some(value) = &value {
            session.record_fill(&self.raw_label, value);
        }
        Ok(value)
    }
}

/// Persist a label→key mapping and immediately re-resolve that single
/// label against the updated mapping set.
///
/// Returns the resolved value, or `None` when the new mapping still does
/// not produce one (e.g. the chosen key is not in the active profile and
/// no fallback key matches).
pub async fn learn_and_resolve(
    pool: &SqlitePool,
    user_id: &str,
    raw_label: &str,
    chosen_key: &str,
) -> AppResult<Option<String>> {
    mapping_repo::upsert_mapping(pool, user_id, raw_label, chosen_key).await?;
    log::info!("learned mapping {raw_label:?} -> {chosen_key:?} for user {user_id}");
    engine::resolve_single(pool, user_id, raw_label).await
}

#[cfg(test)]
#[path = "tests/learning_tests.rs"]
mod tests;
