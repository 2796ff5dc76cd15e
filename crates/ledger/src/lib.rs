//! In-memory ledger state for the movement (expense/income) views.
//!
//! The backend owns persistence; this crate owns what the client keeps
//! between fetches: the normalized movement list with its running balance,
//! the search/date filters that derive the displayed view, recurring-payment
//! reminders, and the notification feed. Everything here is synchronous and
//! pure — network I/O lives in the `client` crate.

pub use categories::{Category, CategoryParent};
pub use error::LedgerError;
pub use filter::{
    DateRange, DayGroup, apply_date_range_filter, apply_text_filter, displayed_groups,
    group_by_date,
};
pub use money::Amount;
pub use movement::{DELETE_GRACE, Movement, MovementKey, MovementKind};
pub use notifications::{AlertLevel, Notification, NotificationFeed};
pub use recurring::{Recurrence, RecurringPayment, Urgency};
pub use store::Ledger;

mod categories;
mod error;
mod filter;
mod money;
mod movement;
mod notifications;
mod recurring;
mod store;
