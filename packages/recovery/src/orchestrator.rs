//! # Recovery Orchestrator
//!
//! The top-level entry point of a recovery pass. One pass per invocation:
//!
//! ```text
//! Idle → Suppressing → Walking → CommittingMain → AwaitingFragments
//!          → RecoveringFragments (ready) | skip (timeout)
//!          → Unsuppressing → Idle
//! ```
//!
//! The warning overlay is held by an RAII guard, so it is removed on
//! every exit path. Nothing in a pass is fatal to the host: every failure
//! degrades to leaving a block or fragment invalid for the user to fix
//! manually, and `run` itself is infallible.

use crate::readiness::await_ready;
use crate::tracker::FragmentTracker;
use crate::walker::walk;
use mason_editor::{EditorHost, HostError};
use mason_parser::FragmentRef;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tuning for the fragment readiness gate.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(300),
            max_attempts: 20,
        }
    }
}

/// What one recovery pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassSummary {
    /// Top-level blocks committed back into the live document.
    pub blocks_committed: usize,
    /// Fragments rewritten and persisted.
    pub fragments_repaired: usize,
    /// Fragments left untouched because of a timeout or a host failure.
    pub fragments_skipped: usize,
    /// Whether the readiness gate gave up waiting.
    pub gate_timed_out: bool,
}

/// Runs recovery passes against one editor host.
pub struct RecoveryOrchestrator<'h, H: EditorHost> {
    host: &'h H,
    config: RecoveryConfig,
}

impl<'h, H: EditorHost> RecoveryOrchestrator<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self::with_config(host, RecoveryConfig::default())
    }

    pub fn with_config(host: &'h H, config: RecoveryConfig) -> Self {
        Self { host, config }
    }

    /// Run one pass after yielding once to the scheduler.
    ///
    /// The pass is deferred from the triggering event so the host can
    /// finish its own initialization before the document snapshot is
    /// read. One scheduled continuation, not a recurring timer.
    pub async fn run_deferred(&self) -> PassSummary {
        tokio::task::yield_now().await;
        self.run().await
    }

    /// Run one recovery pass.
    pub async fn run(&self) -> PassSummary {
        let _overlay = SuppressionGuard::install(self.host);
        let mut summary = PassSummary::default();

        // Walking
        let mut tracker = FragmentTracker::new();
        let walked = walk(self.host, self.host.document_blocks(), &mut tracker);

        // CommittingMain: one replace per changed top-level record,
        // keyed by the identity it supersedes. Failures are isolated per
        // call. Ownership of the replacement passes back to the host, so
        // the transient recovery fields are stripped from the whole
        // subtree first.
        for mut record in walked {
            if !record.was_recovered {
                continue;
            }
            let Some(target) = record.supersedes.clone() else {
                continue;
            };
            record.clear_recovery_flags();
            match self.host.replace_block(&target, record) {
                Ok(()) => summary.blocks_committed += 1,
                Err(error) => {
                    warn!(identity = %target, %error, "failed to commit recovered block");
                }
            }
        }

        // AwaitingFragments
        if tracker.is_empty() {
            return summary;
        }
        let gate = await_ready(
            self.host,
            tracker.pending(),
            self.config.poll_interval,
            self.config.max_attempts,
        )
        .await;

        match gate {
            Ok(()) => {
                // RecoveringFragments: each fragment isolated from the
                // others.
                for &fragment in tracker.pending() {
                    match self.recover_fragment(fragment) {
                        Ok(true) => {
                            summary.fragments_repaired += 1;
                            self.repoint_consumers(fragment, &tracker);
                        }
                        Ok(false) => {}
                        Err(error) => {
                            summary.fragments_skipped += 1;
                            warn!(%fragment, %error, "skipping fragment recovery");
                        }
                    }
                }
            }
            Err(timeout) => {
                // Main-tree commits stand; fragments wait for a later
                // pass.
                summary.gate_timed_out = true;
                summary.fragments_skipped = tracker.pending().len();
                warn!(
                    attempts = timeout.attempts,
                    pending = timeout.still_fetching.len(),
                    "fragment store not ready, skipping fragment recovery"
                );
            }
        }

        summary
    }

    /// Repair one fragment's stored content. Returns whether anything was
    /// rewritten.
    fn recover_fragment(&self, fragment: FragmentRef) -> Result<bool, HostError> {
        let content = self.host.fragment_content(fragment)?;
        let parsed = self.host.parse_markup(&content.content)?;

        let mut local = FragmentTracker::new();
        let walked = walk(self.host, parsed, &mut local);
        if !local.is_empty() {
            debug!(
                %fragment,
                nested = local.pending().len(),
                "nested fragment pointers deferred to a later pass"
            );
        }

        if !walked.iter().any(|record| record.was_recovered) {
            return Ok(false);
        }

        let serialized = self.host.serialize_markup(&walked);
        self.host.update_fragment_content(fragment, serialized)?;
        self.host.persist_fragment(fragment)?;
        info!(%fragment, "auto-recovered shared fragment");
        Ok(true)
    }

    /// Point every consumer of a repaired fragment at a fresh pointer
    /// block, so the live document picks up the rewritten content.
    fn repoint_consumers(&self, fragment: FragmentRef, tracker: &FragmentTracker) {
        for consumer in tracker.consumers_of(fragment) {
            let result = self
                .host
                .create_fragment_reference(fragment)
                .and_then(|pointer| self.host.replace_block(&consumer, pointer));
            if let Err(error) = result {
                warn!(identity = %consumer, %fragment, %error, "failed to repoint fragment consumer");
            }
        }
    }
}

/// Keeps the invalid-warning overlay installed for the duration of a
/// pass; dropping it restores the warnings on every exit path.
struct SuppressionGuard<'h, H: EditorHost> {
    host: &'h H,
}

impl<'h, H: EditorHost> SuppressionGuard<'h, H> {
    fn install(host: &'h H) -> Self {
        host.suppress_invalid_warnings();
        Self { host }
    }
}

impl<H: EditorHost> Drop for SuppressionGuard<'_, H> {
    fn drop(&mut self) {
        self.host.restore_invalid_warnings();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mason_editor::MemoryHost;

    #[test]
    fn test_default_config_matches_gate_defaults() {
        let config = RecoveryConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(300));
        assert_eq!(config.max_attempts, 20);
    }

    #[test]
    fn test_suppression_guard_restores_on_drop() {
        let host = MemoryHost::new("/guard.blk");
        {
            let _guard = SuppressionGuard::install(&host);
            assert!(host.warnings_suppressed());
        }
        assert!(!host.warnings_suppressed());
    }

    #[tokio::test]
    async fn test_empty_document_pass_is_a_no_op() {
        let host = MemoryHost::new("/empty.blk");
        let summary = RecoveryOrchestrator::new(&host).run_deferred().await;

        assert_eq!(summary, PassSummary::default());
        assert!(!host.warnings_suppressed());
    }
}
