//! Movement primitives.
//!
//! A `Movement` is the unified display shape for the two backend record
//! kinds (expenses and incomes). Normalization is a pure field mapping with
//! no error path: the decode boundary in `api_types` has already coerced
//! amounts to cents and parsed dates, so nothing here can fail.

use api_types::movement::{RawExpense, RawIncome, RawMovement};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, Category, LedgerError};

/// How long after creation a movement may still be deleted from a client.
///
/// The backend is the authority; this client-side gate only avoids a
/// round-trip that is guaranteed to be rejected.
pub const DELETE_GRACE: TimeDelta = TimeDelta::hours(24);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Expense,
    Income,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl TryFrom<&str> for MovementKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

/// The true identity of a movement.
///
/// Expense and income ids are independent backend sequences, so the bare id
/// is ambiguous; every lookup goes through the `(kind, id)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MovementKey {
    pub kind: MovementKind,
    pub id: i64,
}

/// A single financial event, expense or income, in display shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: i64,
    pub kind: MovementKind,
    /// Display label: the expense's `place` or the income's `title`.
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Non-negative. The sign of its balance effect comes from `kind`.
    pub total: Amount,
    /// Present only for expenses.
    pub category: Option<Category>,
    /// Present only for expenses.
    pub place: Option<String>,
    pub comment: Option<String>,
    /// Server-assigned; gates the client-side delete grace period.
    pub created_at: Option<DateTime<Utc>>,
}

impl Movement {
    pub fn key(&self) -> MovementKey {
        MovementKey {
            kind: self.kind,
            id: self.id,
        }
    }

    /// The composite ordering key. Lists are kept non-increasing by it.
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }

    /// The movement's effect on the running balance: incomes add, expenses
    /// subtract.
    pub fn signed_total(&self) -> Amount {
        match self.kind {
            MovementKind::Income => self.total,
            MovementKind::Expense => -self.total,
        }
    }

    /// Whether the delete grace period is still open at `now`.
    ///
    /// Movements without a server timestamp remain deletable; the backend
    /// has the final say either way.
    pub fn deletable(&self, now: DateTime<Utc>) -> bool {
        match self.created_at {
            Some(created_at) => now.signed_duration_since(created_at) <= DELETE_GRACE,
            None => true,
        }
    }

    /// Case-insensitive substring test against title, place and comment.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.haystack().contains(&needle)
    }

    fn haystack(&self) -> String {
        let mut text = self.title.to_lowercase();
        if let Some(place) = &self.place {
            text.push(' ');
            text.push_str(&place.to_lowercase());
        }
        if let Some(comment) = &self.comment {
            text.push(' ');
            text.push_str(&comment.to_lowercase());
        }
        text
    }
}

impl From<RawExpense> for Movement {
    /// Expense mapping: the title is the place, category carried over.
    /// Unknown category strings map to `None` (pure mapping, no error path).
    fn from(raw: RawExpense) -> Self {
        Self {
            id: raw.id,
            kind: MovementKind::Expense,
            title: raw.place.clone(),
            date: raw.date,
            time: raw.time,
            total: Amount::new(raw.total_cents),
            category: Category::parse(&raw.category),
            place: Some(raw.place),
            comment: raw.comment,
            created_at: raw.created_at,
        }
    }
}

impl From<RawIncome> for Movement {
    /// Income mapping: no category, no place.
    fn from(raw: RawIncome) -> Self {
        Self {
            id: raw.id,
            kind: MovementKind::Income,
            title: raw.title,
            date: raw.date,
            time: raw.time,
            total: Amount::new(raw.total_cents),
            category: None,
            place: None,
            comment: raw.comment,
            created_at: raw.created_at,
        }
    }
}

impl From<RawMovement> for Movement {
    fn from(raw: RawMovement) -> Self {
        match raw {
            RawMovement::Expense(expense) => expense.into(),
            RawMovement::Income(income) => income.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw_expense() -> RawExpense {
        RawExpense {
            id: 4,
            category: "alimentacion".to_string(),
            place: "Restaurante".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 18).unwrap(),
            time: NaiveTime::from_hms_opt(20, 15, 0).unwrap(),
            total_cents: 7_500,
            comment: Some("Cena con amigos".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn expense_mapping_follows_the_rules() {
        let movement = Movement::from(raw_expense());
        assert_eq!(movement.kind, MovementKind::Expense);
        assert_eq!(movement.title, "Restaurante");
        assert_eq!(movement.place.as_deref(), Some("Restaurante"));
        assert_eq!(movement.category, Some(Category::Alimentacion));
        assert_eq!(movement.total, Amount::new(7_500));
        assert_eq!(movement.signed_total(), Amount::new(-7_500));
    }

    #[test]
    fn income_mapping_has_no_category_or_place() {
        let movement = Movement::from(RawIncome {
            id: 4,
            title: "Sueldo".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            total_cents: 250_000,
            comment: None,
            created_at: None,
        });
        assert_eq!(movement.kind, MovementKind::Income);
        assert_eq!(movement.category, None);
        assert_eq!(movement.place, None);
        assert_eq!(movement.signed_total(), Amount::new(250_000));
    }

    #[test]
    fn normalization_is_deterministic() {
        // Mapping the same record twice yields the same movement,
        // field for field.
        assert_eq!(Movement::from(raw_expense()), Movement::from(raw_expense()));
    }

    #[test]
    fn expense_and_income_ids_do_not_collide() {
        let expense = Movement::from(raw_expense());
        let income = Movement::from(RawIncome {
            id: 4,
            title: "Regalo".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(),
            time: NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
            total_cents: 20_000,
            comment: None,
            created_at: None,
        });
        assert_ne!(expense.key(), income.key());
    }

    #[test]
    fn delete_grace_gates_on_created_at() {
        let created = Utc.with_ymd_and_hms(2025, 9, 18, 20, 15, 0).unwrap();
        let mut movement = Movement::from(raw_expense());
        movement.created_at = Some(created);

        assert!(movement.deletable(created + TimeDelta::hours(23)));
        assert!(!movement.deletable(created + TimeDelta::hours(25)));

        movement.created_at = None;
        assert!(movement.deletable(created + TimeDelta::days(365)));
    }
}
