use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub mod decimal {
    //! Serde helpers for backend decimal amounts.
    //!
    //! The backend is inconsistent about decimal serialization: some
    //! endpoints emit JSON numbers, others numeric strings (`"120.50"`).
    //! Fields tagged `with = "decimal"` always decode to integer cents,
    //! whichever form arrived, and encode back as a canonical decimal
    //! string.

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        wire_cents(Wire::deserialize(deserializer)?).map_err(D::Error::custom)
    }

    fn wire_cents(wire: Wire) -> Result<i64, String> {
        match wire {
            Wire::Number(value) => {
                to_cents(value).ok_or_else(|| "amount out of range".to_string())
            }
            Wire::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(to_cents)
                .ok_or_else(|| format!("invalid decimal amount: {raw:?}")),
        }
    }

    pub fn serialize<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_cents(*cents))
    }

    /// Formats integer cents as a plain decimal string (`12050` → `"120.50"`).
    pub fn format_cents(cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    fn to_cents(value: f64) -> Option<i64> {
        let cents = (value * 100.0).round();
        (cents.is_finite() && cents.abs() < i64::MAX as f64).then_some(cents as i64)
    }

    pub mod option {
        //! `decimal` for nullable amount fields.

        use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<super::Wire>::deserialize(deserializer)? {
                None => Ok(None),
                Some(wire) => super::wire_cents(wire).map(Some).map_err(D::Error::custom),
            }
        }

        pub fn serialize<S>(cents: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match cents {
                Some(cents) => serializer.serialize_str(&super::format_cents(*cents)),
                None => serializer.serialize_none(),
            }
        }
    }
}

pub mod hhmm {
    //! Serde helpers for wall-clock times.
    //!
    //! The backend stores `HH:MM:SS` but clients historically posted bare
    //! `HH:MM`; decoding accepts both, encoding always pads the seconds
    //! (`12:51` → `"12:51:00"`).

    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(|_| D::Error::custom(format!("invalid time: {raw:?}")))
    }

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }
}

pub mod response {
    use super::*;

    /// The backend's uniform response envelope.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ApiResponse<T> {
        pub success: bool,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub data: Option<T>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub meta: Option<PageMeta>,
    }

    impl<T> ApiResponse<T> {
        pub fn ok(message: impl Into<String>, data: T) -> Self {
            Self {
                success: true,
                message: message.into(),
                data: Some(data),
                meta: None,
            }
        }

        /// The local fall-back shape used when a request fails in transit:
        /// `success = false`, no data, the transport error as message.
        pub fn failure(message: impl Into<String>) -> Self {
            Self {
                success: false,
                message: message.into(),
                data: None,
                meta: None,
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PageMeta {
        pub has_more: bool,
        pub next_page: Option<u32>,
    }
}

pub mod movement {
    use super::*;

    /// An expense row as the backend serializes it.
    ///
    /// `total` may arrive as a number or a numeric string; it is coerced to
    /// cents unconditionally at this boundary.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RawExpense {
        pub id: i64,
        pub category: String,
        pub place: String,
        pub date: NaiveDate,
        #[serde(with = "crate::hhmm")]
        pub time: NaiveTime,
        #[serde(rename = "total", with = "crate::decimal")]
        pub total_cents: i64,
        #[serde(default)]
        pub comment: Option<String>,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
    }

    /// An income row as the backend serializes it.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RawIncome {
        pub id: i64,
        pub title: String,
        pub date: NaiveDate,
        #[serde(with = "crate::hhmm")]
        pub time: NaiveTime,
        #[serde(rename = "total", with = "crate::decimal")]
        pub total_cents: i64,
        #[serde(default)]
        pub comment: Option<String>,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
    }

    /// A movement in a mixed list, dispatched on the wire `type` tag.
    ///
    /// Expense and income ids are independent sequences; only the
    /// `(type, id)` pair identifies a record.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum RawMovement {
        Expense(RawExpense),
        Income(RawIncome),
    }

    /// Response body of `GET movements/scan/dashboard/{user_id}/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ScanDashboard {
        #[serde(rename = "current_balance", with = "crate::decimal")]
        pub current_balance_cents: i64,
        pub recent_movements: Vec<RawMovement>,
        pub total_movements: u64,
    }

    /// Response body of `GET movements/scan/all/{user_id}/?page=&page_size=`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MovementsPage {
        pub movements: Vec<RawMovement>,
        pub has_more: bool,
        pub page: u32,
        pub page_size: u32,
        pub total_movements: u64,
        pub loaded_count: u64,
        pub next_page: Option<u32>,
    }

    impl MovementsPage {
        /// The empty shape returned locally when the request fails.
        pub fn empty(page: u32, page_size: u32) -> Self {
            Self {
                movements: Vec::new(),
                has_more: false,
                page,
                page_size,
                total_movements: 0,
                loaded_count: 0,
                next_page: None,
            }
        }
    }

    /// Request body for `POST movements/expense/create/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpenseCreate {
        pub user_id: i64,
        pub category: String,
        pub place: String,
        pub date: NaiveDate,
        #[serde(with = "crate::hhmm")]
        pub time: NaiveTime,
        #[serde(rename = "total", with = "crate::decimal")]
        pub total_cents: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub comment: Option<String>,
    }

    /// Request body for `POST movements/income/create/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct IncomeCreate {
        pub user_id: i64,
        pub title: String,
        pub date: NaiveDate,
        #[serde(with = "crate::hhmm")]
        pub time: NaiveTime,
        #[serde(rename = "total", with = "crate::decimal")]
        pub total_cents: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub comment: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ExpenseCreated {
        #[serde(default)]
        pub message: String,
        pub expense: RawExpense,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct IncomeCreated {
        #[serde(default)]
        pub message: String,
        pub income: RawIncome,
    }
}

pub mod balance {
    use super::*;

    /// Response body of `GET balances/user-balance/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MonthlyIncomeResponse {
        #[serde(default, with = "crate::decimal::option")]
        pub monthly_income: Option<i64>,
        #[serde(default, with = "crate::decimal::option")]
        pub current_balance: Option<i64>,
    }

    /// Request body for `PATCH balances/update-monthly-income/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UpdateMonthlyIncome {
        pub user_id: i64,
        #[serde(rename = "new_monthly_income", with = "crate::decimal")]
        pub new_monthly_income_cents: i64,
    }
}

pub mod recurring {
    use super::*;

    /// A recurring payment reminder as the backend serializes it.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct RawRecurringPayment {
        pub id: i64,
        /// Owning user id.
        pub user: i64,
        pub name: String,
        pub category: String,
        #[serde(rename = "amount", with = "crate::decimal")]
        pub amount_cents: i64,
        /// Currently always `"monthly"`.
        pub recurrence_type: String,
        /// Day of month the payment is due (1-31).
        pub payment_day: u8,
        pub is_active: bool,
        pub start_date: NaiveDate,
        #[serde(default)]
        pub end_date: Option<NaiveDate>,
        #[serde(default)]
        pub last_payment_date: Option<NaiveDate>,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
    }

    /// Request body for `POST alerts/recurring-payments/create/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RecurringPaymentCreate {
        pub user_id: i64,
        pub name: String,
        pub category: String,
        #[serde(rename = "amount", with = "crate::decimal")]
        pub amount_cents: i64,
        pub recurrence_type: String,
        pub payment_day: u8,
        pub start_date: NaiveDate,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<NaiveDate>,
    }
}

pub mod alert {
    use super::*;

    /// A budget alert/notification row.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RawNotification {
        pub id: i64,
        /// One of `risk`, `warning`, `info`, `success`.
        pub alert_type: String,
        pub message: String,
        pub target_month: u32,
        pub target_year: i32,
        pub seen: bool,
        pub created_at: DateTime<Utc>,
    }

    /// Response body of `GET alerts/user-alerts-pagination/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AlertsPage {
        pub success: bool,
        pub data: Vec<RawNotification>,
        pub unread_count: u64,
        pub pagination: AlertsPagination,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AlertsPagination {
        pub page: u32,
        pub page_size: u32,
        pub total_alerts: u64,
        pub loaded_count: u64,
        pub has_more: bool,
        pub next_page: Option<u32>,
    }

    impl AlertsPage {
        /// The empty shape returned locally when the request fails.
        pub fn empty(page_size: u32) -> Self {
            Self {
                success: false,
                data: Vec::new(),
                unread_count: 0,
                pagination: AlertsPagination {
                    page: 1,
                    page_size,
                    total_alerts: 0,
                    loaded_count: 0,
                    has_more: false,
                    next_page: None,
                },
            }
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    /// Response body of `POST users/login/`. The token is absent on
    /// rejected credentials.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LoginResponse {
        #[serde(default)]
        pub token: Option<String>,
        #[serde(default)]
        pub user: Option<User>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct User {
        pub id: i64,
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        #[serde(default)]
        pub birth_date: Option<NaiveDate>,
        #[serde(default)]
        pub gender: String,
        #[serde(default)]
        pub plan: String,
    }

    /// Request body for `POST users/register/`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub email: String,
        pub password: String,
        pub first_name: String,
        pub last_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub birth_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub gender: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::movement::{RawMovement, ScanDashboard};

    #[test]
    fn decimal_accepts_numbers_and_strings() {
        let json = r#"{
            "current_balance": "1250.75",
            "recent_movements": [
                {"type": "expense", "id": 3, "category": "alimentacion",
                 "place": "Supermercado", "date": "2025-09-22", "time": "10:30",
                 "total": "120.50"},
                {"type": "income", "id": 7, "title": "Sueldo",
                 "date": "2025-09-20", "time": "09:00:00", "total": 2500}
            ],
            "total_movements": 2
        }"#;

        let dashboard: ScanDashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.current_balance_cents, 125_075);

        match &dashboard.recent_movements[0] {
            RawMovement::Expense(expense) => {
                assert_eq!(expense.total_cents, 12_050);
                assert_eq!(expense.time.format("%H:%M:%S").to_string(), "10:30:00");
            }
            other => panic!("expected expense, got {other:?}"),
        }
        match &dashboard.recent_movements[1] {
            RawMovement::Income(income) => assert_eq!(income.total_cents, 250_000),
            other => panic!("expected income, got {other:?}"),
        }
    }

    #[test]
    fn decimal_serializes_as_string() {
        let payload = super::movement::IncomeCreate {
            user_id: 1,
            title: "Freelance".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 9, 17).unwrap(),
            time: chrono::NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            total_cents: 80_000,
            comment: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["total"], "800.00");
        assert_eq!(json["time"], "14:00:00");
    }

    #[test]
    fn nullable_amounts_decode() {
        let body: super::balance::MonthlyIncomeResponse =
            serde_json::from_str(r#"{"monthly_income": null, "current_balance": "10.00"}"#)
                .unwrap();
        assert_eq!(body.monthly_income, None);
        assert_eq!(body.current_balance, Some(1000));
    }
}
