//! Recurring-payment reminders (Netflix, internet, credit card...).
//!
//! The backend stores the schedule; the client computes when the next
//! charge lands and how urgent the reminder is.

use api_types::recurring::RawRecurringPayment;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, Category, LedgerError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Monthly,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
        }
    }
}

impl TryFrom<&str> for Recurrence {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "monthly" => Ok(Self::Monthly),
            other => Err(LedgerError::InvalidRecurrence(other.to_string())),
        }
    }
}

/// Reminder severity, by days left until the due date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    /// Due within 3 days.
    Urgent,
    /// Due within a week.
    Warning,
    Normal,
}

impl Urgency {
    pub fn label(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Warning => "warning",
            Self::Normal => "normal",
        }
    }
}

/// A recurring payment reminder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecurringPayment {
    pub id: i64,
    pub name: String,
    pub category: Option<Category>,
    pub amount: Amount,
    pub recurrence: Recurrence,
    /// Day of month the payment is due (1-31). Days past the end of a
    /// month clamp to its last day.
    pub payment_day: u8,
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

impl RecurringPayment {
    /// The next date this payment comes due, seen from `today`.
    ///
    /// Today's own due day still counts as due. Returns `None` when the
    /// reminder is inactive, not started yet past its window, or past
    /// `end_date`.
    pub fn next_due_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        if !self.is_active {
            return None;
        }

        let base = today.max(self.start_date);
        let this_month = due_day_in(base.year(), base.month(), self.payment_day)?;
        let due = if this_month >= base {
            this_month
        } else {
            let (year, month) = next_month(base.year(), base.month());
            due_day_in(year, month, self.payment_day)?
        };

        match self.end_date {
            Some(end) if due > end => None,
            _ => Some(due),
        }
    }

    /// Days from `today` to the next due date (0 = due today).
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.next_due_date(today)
            .map(|due| due.signed_duration_since(today).num_days())
    }

    /// The original reminder classification: due in ≤ 3 days is urgent,
    /// ≤ 7 days a warning, anything later (or no upcoming date) normal.
    pub fn urgency(&self, today: NaiveDate) -> Urgency {
        match self.days_until_due(today) {
            Some(days) if days <= 3 => Urgency::Urgent,
            Some(days) if days <= 7 => Urgency::Warning,
            _ => Urgency::Normal,
        }
    }
}

impl From<RawRecurringPayment> for RecurringPayment {
    fn from(raw: RawRecurringPayment) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            category: Category::parse(&raw.category),
            amount: Amount::new(raw.amount_cents),
            // Unknown recurrence strings fall back to monthly, the only
            // schedule the backend currently emits.
            recurrence: Recurrence::try_from(raw.recurrence_type.as_str())
                .unwrap_or(Recurrence::Monthly),
            payment_day: raw.payment_day,
            is_active: raw.is_active,
            start_date: raw.start_date,
            end_date: raw.end_date,
            last_payment_date: raw.last_payment_date,
            created_at: raw.created_at,
        }
    }
}

/// The due date for `payment_day` within a given month, clamped to the
/// month's last day (the 31st in February lands on the 28th/29th).
fn due_day_in(year: i32, month: u32, payment_day: u8) -> Option<NaiveDate> {
    let day = u32::from(payment_day).clamp(1, last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(payment_day: u8) -> RecurringPayment {
        RecurringPayment {
            id: 1,
            name: "Netflix Premium".to_string(),
            category: Some(Category::StreamingSuscripciones),
            amount: Amount::new(4_490),
            recurrence: Recurrence::Monthly,
            payment_day,
            is_active: true,
            start_date: "2025-01-01".parse().unwrap(),
            end_date: None,
            last_payment_date: None,
            created_at: None,
        }
    }

    #[test]
    fn due_day_later_this_month() {
        let today: NaiveDate = "2025-10-16".parse().unwrap();
        assert_eq!(
            payment(20).next_due_date(today),
            Some("2025-10-20".parse().unwrap())
        );
        assert_eq!(payment(20).days_until_due(today), Some(4));
    }

    #[test]
    fn due_day_already_passed_rolls_to_next_month() {
        let today: NaiveDate = "2025-10-16".parse().unwrap();
        assert_eq!(
            payment(5).next_due_date(today),
            Some("2025-11-05".parse().unwrap())
        );
    }

    #[test]
    fn due_today_counts_as_due() {
        let today: NaiveDate = "2025-10-16".parse().unwrap();
        assert_eq!(payment(16).days_until_due(today), Some(0));
        assert_eq!(payment(16).urgency(today), Urgency::Urgent);
    }

    #[test]
    fn payment_day_clamps_to_short_months() {
        let today: NaiveDate = "2026-02-10".parse().unwrap();
        assert_eq!(
            payment(31).next_due_date(today),
            Some("2026-02-28".parse().unwrap())
        );

        let leap: NaiveDate = "2028-02-10".parse().unwrap();
        assert_eq!(
            payment(31).next_due_date(leap),
            Some("2028-02-29".parse().unwrap())
        );
    }

    #[test]
    fn urgency_thresholds() {
        let today: NaiveDate = "2025-10-16".parse().unwrap();
        assert_eq!(payment(18).urgency(today), Urgency::Urgent);
        assert_eq!(payment(22).urgency(today), Urgency::Warning);
        assert_eq!(payment(30).urgency(today), Urgency::Normal);
    }

    #[test]
    fn inactive_and_ended_payments_have_no_due_date() {
        let today: NaiveDate = "2025-10-16".parse().unwrap();

        let mut inactive = payment(20);
        inactive.is_active = false;
        assert_eq!(inactive.next_due_date(today), None);
        assert_eq!(inactive.urgency(today), Urgency::Normal);

        let mut ended = payment(5);
        ended.end_date = Some("2025-10-31".parse().unwrap());
        assert_eq!(ended.next_due_date(today), None);
    }

    #[test]
    fn starts_in_the_future_use_the_start_month() {
        let today: NaiveDate = "2025-10-16".parse().unwrap();
        let mut upcoming = payment(5);
        upcoming.start_date = "2026-01-01".parse().unwrap();
        assert_eq!(
            upcoming.next_due_date(today),
            Some("2026-01-05".parse().unwrap())
        );
    }
}
