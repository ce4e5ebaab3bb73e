//! Run-wide stop signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use cb_core::RiderId;

#[derive(Debug)]
struct StopState {
    raised: AtomicBool,
    /// `RiderId` of the first rider to dock at the goal, `u32::MAX` if none.
    goal_winner: AtomicU32,
}

/// Broadcast-once cancellation flag shared by every rider of one run.
///
/// Once raised it stays raised.  Raising is idempotent: any number of threads
/// may race to raise it and none of them fails.  Cloning shares the flag.
#[derive(Clone, Debug)]
pub struct StopSignal {
    inner: Arc<StopState>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self {
            inner: Arc::new(StopState {
                raised:      AtomicBool::new(false),
                goal_winner: AtomicU32::new(RiderId::INVALID.0),
            }),
        }
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }

    /// Raise the signal.  Returns `true` only for the call that flipped it.
    pub fn raise(&self) -> bool {
        !self.inner.raised.swap(true, Ordering::AcqRel)
    }

    /// Record `rider` as having docked at the goal and raise the signal.
    ///
    /// Returns `true` if `rider` is the first (and only recorded) goal
    /// winner.  The signal may already have been raised for another reason
    /// (a deadline, a failed sibling); the winner is recorded regardless.
    pub fn raise_for_goal(&self, rider: RiderId) -> bool {
        let first = self
            .inner
            .goal_winner
            .compare_exchange(RiderId::INVALID.0, rider.0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        self.raise();
        first
    }

    /// The rider that reached the goal first, if any.
    pub fn goal_winner(&self) -> Option<RiderId> {
        match self.inner.goal_winner.load(Ordering::Acquire) {
            id if id == RiderId::INVALID.0 => None,
            id => Some(RiderId(id)),
        }
    }
}
