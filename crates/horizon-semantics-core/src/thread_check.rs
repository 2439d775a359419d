//! Thread affinity checks.
//!
//! The semantics cache is single-threaded. Updates, host queries and action
//! requests all arrive on the thread that created the bridge, which records
//! that thread once and checks it on every entry point:
//!
//! ```
//! use horizon_semantics_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! affinity.check("apply_update");
//!
//! let moved = std::thread::spawn(move || affinity.is_owner_thread());
//! assert!(!moved.join().unwrap());
//! ```

use std::thread::{self, ThreadId};

/// The thread an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    #[inline]
    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic unless called on the owning thread.
    ///
    /// `operation` names the entry point in the panic message.
    #[inline]
    pub fn check(&self, operation: &str) {
        if !self.is_owner_thread() {
            wrong_thread(self.owner, operation);
        }
    }

    /// [`check`](Self::check) in debug builds, nothing in release builds.
    #[inline]
    pub fn debug_check(&self, operation: &str) {
        if cfg!(debug_assertions) {
            self.check(operation);
        }
    }
}

#[cold]
#[inline(never)]
fn wrong_thread(owner: ThreadId, operation: &str) -> ! {
    let current = thread::current();
    panic!(
        "{operation} called on thread {:?} ({}), but the accessibility bridge belongs to \
         thread {owner:?}; post the call to the owning thread",
        current.id(),
        current.name().unwrap_or("<unnamed>"),
    )
}
