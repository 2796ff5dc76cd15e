//! The in-memory ledger: authoritative movement list plus running balance.
//!
//! The store is seeded from an authoritative dashboard snapshot and then
//! mutated optimistically as create/delete calls succeed, so the UI never
//! waits for a second round-trip to show the new balance. The optimistic
//! balance is latency smoothing only: the next `initialize` overwrites it
//! with whatever the server reports (server wins).

use crate::{Amount, Movement, MovementKind};

/// The in-memory ledger owned by one page/session.
///
/// Invariants, upheld by every mutation:
/// - `movements` is sorted non-increasing by `(date, time)`, ties stable by
///   insertion;
/// - `balance` equals the last server-reported balance plus the signed sum
///   of optimistic inserts minus the signed sum of optimistic deletes.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    movements: Vec<Movement>,
    balance: Amount,
    total_movements: u64,
    has_more: bool,
    next_page: Option<u32>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces list and balance wholesale from an authoritative snapshot.
    ///
    /// Any optimistic adjustments accumulated since the last snapshot are
    /// discarded; the server's balance wins.
    pub fn initialize(&mut self, balance: Amount, movements: Vec<Movement>, total_movements: u64) {
        self.movements = movements;
        self.sort();
        self.balance = balance;
        self.total_movements = total_movements;
        self.has_more = self.total_movements > self.movements.len() as u64;
        self.next_page = self.has_more.then_some(2);
    }

    /// Optimistically applies a just-created movement.
    ///
    /// The movement is prepended and the whole list re-sorted, so a
    /// past-dated movement lands in its chronological position rather than
    /// at the top. The balance moves by the movement's signed total.
    pub fn insert(&mut self, movement: Movement) {
        self.balance += movement.signed_total();
        self.movements.insert(0, movement);
        self.sort();
        self.total_movements += 1;
    }

    /// Optimistically applies a confirmed deletion.
    ///
    /// Matches on the `(kind, id)` pair and reverses the movement's balance
    /// effect. A missing key is a silent no-op returning `None`: the UI may
    /// race a double-click delete against an already-processed one.
    pub fn remove(&mut self, kind: MovementKind, id: i64) -> Option<Movement> {
        let index = self
            .movements
            .iter()
            .position(|m| m.kind == kind && m.id == id)?;
        let movement = self.movements.remove(index);
        self.balance -= movement.signed_total();
        self.total_movements = self.total_movements.saturating_sub(1);
        Some(movement)
    }

    /// Merges a fetched page into the authoritative list.
    ///
    /// Records whose `(kind, id)` is already present are skipped (an
    /// optimistic insert may precede the page that contains it), then the
    /// list is re-sorted.
    pub fn merge_page(
        &mut self,
        movements: Vec<Movement>,
        has_more: bool,
        next_page: Option<u32>,
    ) {
        for movement in movements {
            if self.contains(movement.kind, movement.id) {
                continue;
            }
            self.movements.push(movement);
        }
        self.sort();
        self.has_more = has_more;
        self.next_page = next_page;
    }

    pub fn contains(&self, kind: MovementKind, id: i64) -> bool {
        self.movements.iter().any(|m| m.kind == kind && m.id == id)
    }

    pub fn get(&self, kind: MovementKind, id: i64) -> Option<&Movement> {
        self.movements.iter().find(|m| m.kind == kind && m.id == id)
    }

    /// The authoritative list, sorted non-increasing by `(date, time)`.
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// The running balance.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Server-reported total count, adjusted by optimistic mutations.
    pub fn total_movements(&self) -> u64 {
        self.total_movements
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_page(&self) -> Option<u32> {
        self.next_page
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    fn sort(&mut self) {
        // Stable descending sort: equal keys keep insertion order, so an
        // optimistic prepend stays ahead of older records with the same
        // date and time.
        self.movements
            .sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
    }
}
