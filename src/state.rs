//! Lifecycle state tracking.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

const INITIALIZED: u8 = 0b01;
const DISPOSED: u8 = 0b10;

/// Observable phase of a service's lifecycle.
///
/// The two flags behind it are independent and monotonic, which gives four
/// reachable combinations. Both `Disposed` variants are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fresh,
    Initialized,
    Disposed { initialized: bool },
}

/// Initialized/disposed flags owned by a single service.
///
/// Embed one in every type implementing [`ServiceBase`](crate::ServiceBase)
/// and hand it out from `lifecycle()`. The flags can only be moved forward by
/// the lifecycle operations; there is no public way to set or clear them.
///
/// Both flags live in one atomic byte, so claiming initialization is a single
/// compare-and-set that loses against an earlier claim and against disposal.
#[derive(Default)]
pub struct LifecycleState {
    bits: AtomicU8,
}

impl LifecycleState {
    /// Creates a fresh state with both flags cleared.
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.bits.load(Ordering::Acquire) & INITIALIZED != 0
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.bits.load(Ordering::Acquire) & DISPOSED != 0
    }

    pub fn phase(&self) -> Phase {
        let bits = self.bits.load(Ordering::Acquire);
        match (bits & INITIALIZED != 0, bits & DISPOSED != 0) {
            (false, false) => Phase::Fresh,
            (true, false) => Phase::Initialized,
            (initialized, true) => Phase::Disposed { initialized },
        }
    }

    /// Sets the initialized flag if neither flag is set yet.
    ///
    /// Returns `true` for the one caller that won the claim.
    pub(crate) fn try_claim_initialization(&self) -> bool {
        self.bits
            .compare_exchange(0, INITIALIZED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn mark_disposed(&self) {
        self.bits.fetch_or(DISPOSED, Ordering::AcqRel);
    }
}

impl fmt::Debug for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleState")
            .field("initialized", &self.is_initialized())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
