//! Invariant checks over the application state.
//!
//! Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Property and simulation tests run
//! [`check_all`] after every step.

use std::{collections::HashSet, fmt};

use feedline_app::App;
use feedline_core::{DEFAULT_HISTORY_CAPACITY, FEED_CAP};

/// The invariant that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    /// The visible chat list must never contain two entries with the same
    /// id while those ids are reconciled against the pending set.
    UniqueMessageIds,
    /// The feed page must never exceed its cap.
    FeedCapRespected,
    /// Every visible post must come from the held page.
    VisibleFromPage,
    /// The console history mirror must stay bounded.
    HistoryBounded,
}

/// A failed invariant with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant failed.
    pub invariant: InvariantKind,
    /// Human-readable context.
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.invariant, self.detail)
    }
}

/// Check every invariant against the application state.
///
/// # Errors
///
/// Returns the list of violations if any invariant fails.
pub fn check_all(app: &App) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    for message in app.chat().messages() {
        if !seen.insert(message.id.as_str()) {
            violations.push(Violation {
                invariant: InvariantKind::UniqueMessageIds,
                detail: format!("duplicate chat message id {}", message.id),
            });
        }
    }

    if app.feed().posts().len() > FEED_CAP {
        violations.push(Violation {
            invariant: InvariantKind::FeedCapRespected,
            detail: format!("page holds {} posts, cap is {FEED_CAP}", app.feed().posts().len()),
        });
    }

    let page_ids: HashSet<u64> = app.feed().posts().iter().map(|p| p.id).collect();
    for post in app.feed().visible() {
        if !page_ids.contains(&post.id) {
            violations.push(Violation {
                invariant: InvariantKind::VisibleFromPage,
                detail: format!("visible post {} not in the held page", post.id),
            });
        }
    }

    if app.history().len() > DEFAULT_HISTORY_CAPACITY {
        violations.push(Violation {
            invariant: InvariantKind::HistoryBounded,
            detail: format!(
                "history holds {} records, cap is {DEFAULT_HISTORY_CAPACITY}",
                app.history().len()
            ),
        });
    }

    if violations.is_empty() { Ok(()) } else { Err(violations) }
}
