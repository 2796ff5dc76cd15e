//! Derives the displayed list from the stored one: free-text search, a
//! relative date-range filter, and grouping by calendar date.
//!
//! Date arithmetic works on `NaiveDate` only — a movement's date at local
//! midnight, no time-of-day component. Parsing a bare `YYYY-MM-DD` through a
//! timezone-aware type shifts it by the UTC offset and makes "today"
//! off-by-one; keeping everything calendar-only avoids that entirely. The
//! caller decides what "today" is (the binary resolves it in the configured
//! timezone).

use std::str::FromStr;

use chrono::NaiveDate;

use crate::{LedgerError, Movement};

/// Relative date window for the movement list, selected by the UI keys
/// `today | 7 | 15 | 30 | 90 | all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRange {
    Today,
    Days(u16),
    All,
}

impl DateRange {
    /// The standard picker options, in display order.
    pub const OPTIONS: [DateRange; 6] = [
        Self::Today,
        Self::Days(7),
        Self::Days(15),
        Self::Days(30),
        Self::Days(90),
        Self::All,
    ];

    /// Whether `date` falls inside the window ending at `today`.
    ///
    /// `Today` keeps dates less than one day old, `Days(n)` dates less than
    /// `n` days old. Future dates have a negative age and are always kept,
    /// matching the strict `< n` rule.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        let days = match self {
            Self::All => return true,
            Self::Today => 1,
            Self::Days(days) => i64::from(days),
        };
        today.signed_duration_since(date).num_days() < days
    }

    pub fn key(self) -> String {
        match self {
            Self::Today => "today".to_string(),
            Self::Days(days) => days.to_string(),
            Self::All => "all".to_string(),
        }
    }
}

impl FromStr for DateRange {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" => Ok(Self::Today),
            "all" => Ok(Self::All),
            raw => match raw.parse::<u16>() {
                Ok(days) if days > 0 => Ok(Self::Days(days)),
                _ => Err(LedgerError::InvalidDateRange(raw.to_string())),
            },
        }
    }
}

/// Keeps movements whose title, place or comment contains `query`,
/// case-insensitively. A blank query returns the input unchanged.
pub fn apply_text_filter(movements: Vec<Movement>, query: &str) -> Vec<Movement> {
    if query.trim().is_empty() {
        return movements;
    }
    movements.into_iter().filter(|m| m.matches(query)).collect()
}

/// Keeps movements inside the date window. `All` returns the input
/// unchanged.
pub fn apply_date_range_filter(
    movements: Vec<Movement>,
    range: DateRange,
    today: NaiveDate,
) -> Vec<Movement> {
    if range == DateRange::All {
        return movements;
    }
    movements
        .into_iter()
        .filter(|m| range.contains(m.date, today))
        .collect()
}

/// One rendered day section: a date and its movements in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub movements: Vec<Movement>,
}

/// Partitions an already-filtered, already-sorted list into per-date
/// buckets, in the order dates are first encountered. With the usual
/// descending input the buckets come out in descending date order.
pub fn group_by_date(movements: &[Movement]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for movement in movements {
        match groups.iter_mut().find(|g| g.date == movement.date) {
            Some(group) => group.movements.push(movement.clone()),
            None => groups.push(DayGroup {
                date: movement.date,
                movements: vec![movement.clone()],
            }),
        }
    }
    groups
}

/// The combined pipeline the UI renders: text filter, then date filter,
/// then grouping, over the full authoritative list.
pub fn displayed_groups(
    movements: &[Movement],
    query: &str,
    range: DateRange,
    today: NaiveDate,
) -> Vec<DayGroup> {
    let filtered = apply_date_range_filter(
        apply_text_filter(movements.to_vec(), query),
        range,
        today,
    );
    group_by_date(&filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, MovementKind};
    use chrono::NaiveTime;

    fn movement(kind: MovementKind, title: &str, date: &str, time: &str) -> Movement {
        Movement {
            id: 0,
            kind,
            title: title.to_string(),
            date: date.parse().unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            total: Amount::new(1000),
            category: None,
            place: None,
            comment: None,
            created_at: None,
        }
    }

    #[test]
    fn text_filter_is_case_insensitive() {
        let list = vec![
            movement(MovementKind::Income, "Netflix Premium", "2025-09-20", "09:00"),
            movement(MovementKind::Expense, "Supermercado", "2025-09-19", "10:00"),
        ];

        let hits = apply_text_filter(list.clone(), "NETFLIX");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Netflix Premium");

        // Blank and whitespace-only queries disable the filter.
        assert_eq!(apply_text_filter(list.clone(), "").len(), 2);
        assert_eq!(apply_text_filter(list, "   ").len(), 2);
    }

    #[test]
    fn text_filter_searches_place_and_comment() {
        let mut with_comment =
            movement(MovementKind::Expense, "Farmacia", "2025-09-15", "11:20");
        with_comment.comment = Some("ibuprofeno para el viaje".to_string());

        let hits = apply_text_filter(vec![with_comment], "VIAJE");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn today_range_is_a_midnight_boundary() {
        let today: NaiveDate = "2025-09-22".parse().unwrap();
        let at_midnight = movement(MovementKind::Expense, "Taxi", "2025-09-22", "00:00");
        let last_night = movement(MovementKind::Expense, "Cine", "2025-09-21", "23:59");

        let kept = apply_date_range_filter(
            vec![at_midnight, last_night],
            DateRange::Today,
            today,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Taxi");
    }

    #[test]
    fn numeric_ranges_use_strict_day_difference() {
        let today: NaiveDate = "2025-09-22".parse().unwrap();
        let six_days = movement(MovementKind::Expense, "a", "2025-09-16", "12:00");
        let seven_days = movement(MovementKind::Expense, "b", "2025-09-15", "12:00");

        let kept = apply_date_range_filter(
            vec![six_days, seven_days],
            DateRange::Days(7),
            today,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "a");
    }

    #[test]
    fn range_parses_the_picker_keys() {
        for option in DateRange::OPTIONS {
            assert_eq!(option.key().parse::<DateRange>().unwrap(), option);
        }
        assert_eq!("30".parse::<DateRange>().unwrap(), DateRange::Days(30));
        assert!("ayer".parse::<DateRange>().is_err());
        assert!("0".parse::<DateRange>().is_err());
    }

    #[test]
    fn groups_follow_first_encounter_order() {
        let list = vec![
            movement(MovementKind::Income, "Sueldo", "2025-09-20", "09:00"),
            movement(MovementKind::Expense, "Cine", "2025-09-20", "08:00"),
            movement(MovementKind::Expense, "Taxi", "2025-09-19", "08:30"),
        ];

        let groups = group_by_date(&list);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, "2025-09-20".parse::<NaiveDate>().unwrap());
        assert_eq!(groups[0].movements.len(), 2);
        assert_eq!(groups[0].movements[0].title, "Sueldo");
        assert_eq!(groups[1].movements[0].title, "Taxi");
    }

    #[test]
    fn combined_pipeline_applies_both_predicates() {
        let today: NaiveDate = "2025-09-22".parse().unwrap();
        let list = vec![
            movement(MovementKind::Income, "Netflix Premium", "2025-09-21", "09:00"),
            movement(MovementKind::Income, "Netflix Premium", "2025-08-01", "09:00"),
            movement(MovementKind::Expense, "Supermercado", "2025-09-21", "10:00"),
        ];

        let groups = displayed_groups(&list, "netflix", DateRange::Days(7), today);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].movements.len(), 1);
        assert_eq!(groups[0].movements[0].date, list[0].date);

        // Bucket dates are a subset of the input's dates.
        for group in &groups {
            assert!(list.iter().any(|m| m.date == group.date));
        }
    }
}
