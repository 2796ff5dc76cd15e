//! The notification panel's local state: a fetched page of alerts plus an
//! unread counter kept consistent under local mark-seen mutations.

use api_types::alert::RawNotification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Risk,
    Warning,
    Info,
    Success,
}

impl AlertLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Risk => "risk",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

impl TryFrom<&str> for AlertLevel {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "risk" => Ok(Self::Risk),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            other => Err(LedgerError::InvalidAlertLevel(other.to_string())),
        }
    }
}

/// A budget alert shown in the notification panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub level: AlertLevel,
    pub message: String,
    pub target_month: u32,
    pub target_year: i32,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RawNotification> for Notification {
    fn from(raw: RawNotification) -> Self {
        Self {
            id: raw.id,
            // Unrecognized levels render as plain info rather than failing
            // the whole feed.
            level: AlertLevel::try_from(raw.alert_type.as_str()).unwrap_or(AlertLevel::Info),
            message: raw.message,
            target_month: raw.target_month,
            target_year: raw.target_year,
            seen: raw.seen,
            created_at: raw.created_at,
        }
    }
}

/// The locally-held notification list.
///
/// The unread counter starts from the server-reported total (which covers
/// pages not yet fetched) and is adjusted locally as items are marked seen,
/// only on a real unseen-to-seen transition, so a double click cannot drive
/// it below the truth.
#[derive(Clone, Debug, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
    unread: u64,
    has_more: bool,
    next_page: Option<u32>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the feed wholesale from a fresh first page.
    pub fn replace(
        &mut self,
        items: Vec<Notification>,
        unread: u64,
        has_more: bool,
        next_page: Option<u32>,
    ) {
        self.items = items;
        self.unread = unread;
        self.has_more = has_more;
        self.next_page = next_page;
    }

    /// Appends a further page, skipping ids already present. The unread
    /// counter is not touched: the server total already counted them.
    pub fn merge_page(
        &mut self,
        items: Vec<Notification>,
        has_more: bool,
        next_page: Option<u32>,
    ) {
        for item in items {
            if self.items.iter().any(|n| n.id == item.id) {
                continue;
            }
            self.items.push(item);
        }
        self.has_more = has_more;
        self.next_page = next_page;
    }

    /// Marks one notification seen locally. Returns `true` only when the
    /// item existed and was unseen, in which case the unread counter drops
    /// by one.
    pub fn mark_seen(&mut self, id: i64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(item) if !item.seen => {
                item.seen = true;
                self.unread = self.unread.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Marks every risk-level notification seen, returning how many
    /// actually transitioned.
    pub fn mark_all_risk_seen(&mut self) -> u64 {
        let mut transitioned = 0;
        for item in &mut self.items {
            if item.level == AlertLevel::Risk && !item.seen {
                item.seen = true;
                transitioned += 1;
            }
        }
        self.unread = self.unread.saturating_sub(transitioned);
        transitioned
    }

    pub fn unread_count(&self) -> u64 {
        self.unread
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_page(&self) -> Option<u32> {
        self.next_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn notification(id: i64, level: AlertLevel, seen: bool) -> Notification {
        Notification {
            id,
            level,
            message: format!("alerta {id}"),
            target_month: 10,
            target_year: 2025,
            seen,
            created_at: Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn mark_seen_decrements_only_on_transition() {
        let mut feed = NotificationFeed::new();
        feed.replace(
            vec![
                notification(1, AlertLevel::Risk, false),
                notification(2, AlertLevel::Info, true),
            ],
            5,
            false,
            None,
        );

        assert!(feed.mark_seen(1));
        assert_eq!(feed.unread_count(), 4);

        // Second click on the same item, and a click on an already-seen
        // item, change nothing.
        assert!(!feed.mark_seen(1));
        assert!(!feed.mark_seen(2));
        assert!(!feed.mark_seen(99));
        assert_eq!(feed.unread_count(), 4);
    }

    #[test]
    fn mark_all_risk_seen_counts_transitions() {
        let mut feed = NotificationFeed::new();
        feed.replace(
            vec![
                notification(1, AlertLevel::Risk, false),
                notification(2, AlertLevel::Risk, true),
                notification(3, AlertLevel::Warning, false),
            ],
            3,
            false,
            None,
        );

        assert_eq!(feed.mark_all_risk_seen(), 1);
        assert_eq!(feed.unread_count(), 2);
        assert!(feed.items().iter().all(|n| n.level != AlertLevel::Risk || n.seen));
    }

    #[test]
    fn merge_page_dedups_and_keeps_the_counter() {
        let mut feed = NotificationFeed::new();
        feed.replace(
            vec![notification(1, AlertLevel::Info, false)],
            2,
            true,
            Some(2),
        );

        feed.merge_page(
            vec![
                notification(1, AlertLevel::Info, false),
                notification(2, AlertLevel::Warning, false),
            ],
            false,
            None,
        );

        assert_eq!(feed.items().len(), 2);
        assert_eq!(feed.unread_count(), 2);
        assert!(!feed.has_more());
    }
}
