//! # Fragment Readiness Gate
//!
//! The host populates its fragment store asynchronously; fragment content
//! referenced by a document may still be in flight when a recovery pass
//! reaches it. The gate waits for every tracked fragment with a bounded
//! cooperative poll loop: a fragment deleted mid-flight may never stop
//! reporting "fetching", and an unbounded wait would hang the pass
//! forever.

use mason_editor::EditorHost;
use mason_parser::FragmentRef;
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use tracing::debug;

/// The attempt ceiling elapsed with at least one fragment still pending.
///
/// Recoverable at pass level: fragment recovery is skipped for this pass;
/// main-tree recovery already committed stands on its own.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} fragment(s) still fetching after {attempts} polls", still_fetching.len())]
pub struct GateTimeout {
    pub attempts: u32,
    pub still_fetching: Vec<FragmentRef>,
}

/// Wait until the host reports none of `fragments` as still fetching.
///
/// Polls the host's fetch predicate for every fragment, sleeping
/// `poll_interval` between rounds, for at most `max_attempts` polls
/// (exactly `max_attempts` when the condition never holds). Resolves
/// immediately for an empty set. No timer outlives resolution.
pub async fn await_ready<H: EditorHost>(
    host: &H,
    fragments: &[FragmentRef],
    poll_interval: Duration,
    max_attempts: u32,
) -> Result<(), GateTimeout> {
    let max_attempts = max_attempts.max(1);
    let mut still_fetching = Vec::new();

    for attempt in 1..=max_attempts {
        still_fetching = fragments
            .iter()
            .copied()
            .filter(|fragment| host.is_fragment_fetching(*fragment))
            .collect();

        if still_fetching.is_empty() {
            return Ok(());
        }

        debug!(attempt, pending = still_fetching.len(), "fragments still fetching");

        if attempt < max_attempts {
            time::sleep(poll_interval).await;
        }
    }

    Err(GateTimeout {
        attempts: max_attempts,
        still_fetching,
    })
}
