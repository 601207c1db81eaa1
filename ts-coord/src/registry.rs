//! The global timestamp registry (component C3): `commit`, `oldest`,
//! `stable`, `pinned`, their presence flags, and the two derived
//! "is-pinned" booleans, all guarded by a single `rw_main` lock.

use crate::timestamp::Timestamp8;
use parking_lot::RwLock;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RegistryInner {
    pub(crate) commit_ts: Timestamp8,
    pub(crate) oldest_ts: Timestamp8,
    pub(crate) stable_ts: Timestamp8,
    pub(crate) pinned_ts: Timestamp8,
    pub(crate) has_commit: bool,
    pub(crate) has_oldest: bool,
    pub(crate) has_stable: bool,
    pub(crate) has_pinned: bool,
    pub(crate) oldest_is_pinned: bool,
    pub(crate) stable_is_pinned: bool,
    /// Read timestamp of the active checkpoint's transaction, if any
    /// (supplemental hook from SPEC_FULL.md §3).
    pub(crate) checkpoint_read_ts: Option<Timestamp8>,
}

/// `rw_main`: the single reader-writer lock guarding every field above.
#[derive(Default)]
pub(crate) struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn snapshot(&self) -> RegistryInner {
        *self.inner.read()
    }

    pub(crate) fn with_read<R>(&self, f: impl FnOnce(&RegistryInner) -> R) -> R {
        f(&self.inner.read())
    }

    pub(crate) fn with_write<R>(&self, f: impl FnOnce(&mut RegistryInner) -> R) -> R {
        f(&mut self.inner.write())
    }
}
