//! Instrumented element type for lifecycle and failure-safety tests.
//!
//! [`Obj`] records every default construction, explicit construction,
//! clone, clone-assignment and drop in a per-thread [`Census`]. Because the
//! counters are thread-local, tests running in parallel never see each
//! other's objects.
//!
//! Failures are injected with budgets: [`Obj::fail_after`] lets `n` more
//! constructions succeed and makes the next one panic, once.
//! [`Obj::fail_assign_after`] does the same for `clone_from`.

use std::cell::Cell;

/// Lifecycle counters for [`Obj`] on the current thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    /// `Obj::default()` calls that completed.
    pub defaults: usize,
    /// `Obj::new()` calls that completed.
    pub constructed: usize,
    /// `Obj::clone()` calls that completed.
    pub clones: usize,
    /// `Obj::clone_from()` calls that completed.
    pub clone_assigns: usize,
    /// `Obj` values dropped.
    pub drops: usize,
}

impl Census {
    /// Total number of objects brought into existence.
    pub fn created(&self) -> usize {
        self.defaults + self.constructed + self.clones
    }

    /// Objects created and not yet dropped.
    pub fn live(&self) -> isize {
        self.created() as isize - self.drops as isize
    }
}

thread_local! {
    static CENSUS: Cell<Census> = Cell::new(Census::default());
    static CONSTRUCT_BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
    static ASSIGN_BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
}

fn record(update: impl FnOnce(&mut Census)) {
    CENSUS.with(|c| {
        let mut census = c.get();
        update(&mut census);
        c.set(census);
    });
}

/// Spend one unit of `budget`. Returns `true` when the budget was already
/// exhausted, disarming it so the failure fires exactly once.
fn spend(budget: &'static std::thread::LocalKey<Cell<Option<usize>>>) -> bool {
    budget.with(|b| match b.get() {
        Some(0) => {
            b.set(None);
            true
        }
        Some(left) => {
            b.set(Some(left - 1));
            false
        }
        None => false,
    })
}

fn charge_construction(kind: &str) {
    if spend(&CONSTRUCT_BUDGET) {
        panic!("Obj: injected {kind} failure");
    }
}

/// An element that counts its own lifecycle.
#[derive(Debug, PartialEq, Eq)]
pub struct Obj {
    pub id: i32,
}

impl Obj {
    /// Construct an object with the given id.
    ///
    /// # Panics
    ///
    /// Panics if a construction failure is armed and due.
    pub fn new(id: i32) -> Self {
        charge_construction("construction");
        record(|c| c.constructed += 1);
        Self { id }
    }

    /// Clear the census and disarm every failure budget.
    pub fn reset() {
        CENSUS.with(|c| c.set(Census::default()));
        Self::disarm();
    }

    /// Disarm every failure budget without touching the census.
    pub fn disarm() {
        CONSTRUCT_BUDGET.with(|b| b.set(None));
        ASSIGN_BUDGET.with(|b| b.set(None));
    }

    /// Snapshot of this thread's counters.
    pub fn census() -> Census {
        CENSUS.with(Cell::get)
    }

    /// Objects currently alive on this thread.
    pub fn live() -> isize {
        Self::census().live()
    }

    /// Let `n` more constructions (new, default or clone) succeed, then
    /// panic on the next one.
    pub fn fail_after(n: usize) {
        CONSTRUCT_BUDGET.with(|b| b.set(Some(n)));
    }

    /// Let `n` more `clone_from` calls succeed, then panic on the next one.
    pub fn fail_assign_after(n: usize) {
        ASSIGN_BUDGET.with(|b| b.set(Some(n)));
    }
}

impl Default for Obj {
    fn default() -> Self {
        charge_construction("default construction");
        record(|c| c.defaults += 1);
        Self { id: 0 }
    }
}

impl Clone for Obj {
    fn clone(&self) -> Self {
        charge_construction("clone");
        record(|c| c.clones += 1);
        Self { id: self.id }
    }

    fn clone_from(&mut self, source: &Self) {
        if spend(&ASSIGN_BUDGET) {
            panic!("Obj: injected clone_from failure");
        }
        record(|c| c.clone_assigns += 1);
        self.id = source.id;
    }
}

impl Drop for Obj {
    fn drop(&mut self) {
        record(|c| c.drops += 1);
    }
}

impl PartialEq<i32> for Obj {
    fn eq(&self, other: &i32) -> bool {
        self.id == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catch_panic;

    #[test]
    fn census_tracks_lifecycle() {
        Obj::reset();
        {
            let a = Obj::new(1);
            let mut b = a.clone();
            let c = Obj::default();
            b.clone_from(&c);
            assert_eq!(b, 0);
        }
        let census = Obj::census();
        assert_eq!(census.constructed, 1);
        assert_eq!(census.clones, 1);
        assert_eq!(census.defaults, 1);
        assert_eq!(census.clone_assigns, 1);
        assert_eq!(census.drops, 3);
        assert_eq!(Obj::live(), 0);
    }

    #[test]
    fn construction_failure_fires_once() {
        Obj::reset();
        Obj::fail_after(2);
        let first = Obj::new(1);
        let second = first.clone();
        assert!(catch_panic(Obj::default).is_err());
        // Disarmed after firing.
        let third = Obj::new(3);
        assert_eq!(Obj::live(), 3);
        drop((first, second, third));
        assert_eq!(Obj::live(), 0);
    }

    #[test]
    fn assign_failure_leaves_target_unchanged() {
        Obj::reset();
        let mut target = Obj::new(1);
        let source = Obj::new(2);
        Obj::fail_assign_after(0);
        assert!(catch_panic(|| target.clone_from(&source)).is_err());
        assert_eq!(target, 1);
        assert_eq!(Obj::census().clone_assigns, 0);
    }
}
