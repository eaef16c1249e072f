//! Revision numbers for collaborator writes.
//!
//! A reducer stamps every write it schedules (a cart save, a URL rewrite)
//! with the next [`Revision`] of its state. The store runs effects as
//! independent tasks, so two writes may reach the collaborator in either
//! order. A [`WriteGate`] shared by those tasks applies a write only if no
//! later revision has been applied yet, so the collaborator always ends up
//! holding the newest state.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Position of a state change in the order the reducer accepted it
///
/// # Examples
///
/// ```
/// use furnmart_core::revision::Revision;
///
/// let first = Revision::INITIAL.next();
/// assert_eq!(first.value(), 1);
/// assert!(first.next() > first);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(u64);

impl Revision {
    /// Revision of state that has not changed yet
    pub const INITIAL: Self = Self(0);

    /// Creates a revision with the given value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The revision number
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The following revision
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Advances `self` and returns the new revision
    pub const fn bump(&mut self) -> Self {
        *self = self.next();
        *self
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Applies writes to one collaborator key in revision order
///
/// Clones share the applied revision. A write runs while the gate is held,
/// so a newer write issued concurrently waits for it and then lands last.
///
/// # Examples
///
/// ```
/// use furnmart_core::revision::{Revision, WriteGate};
///
/// let gate = WriteGate::new();
/// let mut written = Vec::new();
///
/// assert!(gate.apply(Revision::new(2), || written.push(2)));
/// assert!(!gate.apply(Revision::new(1), || written.push(1)));
/// assert_eq!(written, vec![2]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WriteGate {
    applied: Arc<Mutex<Revision>>,
}

impl WriteGate {
    /// Creates a gate that has applied nothing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `write` unless `revision` is not newer than the last applied one
    ///
    /// Returns `true` if `write` ran. A write that fails inside `write` still
    /// counts as applied: an older payload must not replace it afterwards.
    pub fn apply<F>(&self, revision: Revision, write: F) -> bool
    where
        F: FnOnce(),
    {
        // A panicking write leaves the revision untouched; keep going
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if revision <= *applied {
            return false;
        }
        write();
        *applied = revision;
        true
    }

    /// Last revision that was applied
    #[must_use]
    pub fn applied(&self) -> Revision {
        *self.applied.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
