//! HTTP wrappers over the remote finance backend.
//!
//! Every endpoint the app consumes has one typed wrapper here. Auth calls
//! surface a typed [`ClientError`]; data calls instead fold any failure into
//! a `success = false` envelope with a default/empty data shape, so callers
//! render an empty state instead of handling transport errors — the
//! backend's own error message is carried through when it sent one.

use api_types::{
    alert::AlertsPage,
    balance::{MonthlyIncomeResponse, UpdateMonthlyIncome},
    movement::{
        ExpenseCreate, ExpenseCreated, IncomeCreate, IncomeCreated, MovementsPage, RawExpense,
        RawIncome, ScanDashboard,
    },
    recurring::{RawRecurringPayment, RecurringPaymentCreate},
    response::ApiResponse,
    user::{Credentials, LoginResponse, RegisterRequest},
};
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

pub use session::{DEFAULT_SESSION_PATH, Session};

mod session;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base_url: {0}")]
    BaseUrl(String),
    #[error("credenciales inválidas")]
    Unauthorized,
    #[error("sin permisos")]
    Forbidden,
    #[error("no encontrado")]
    NotFound,
    #[error("error de validación: {0}")]
    Validation(String),
    #[error("error del servidor: {0}")]
    Server(String),
    #[error("servidor no alcanzable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Error bodies come in two dialects depending on the endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // A base without a trailing slash would swallow its last segment on
        // join.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|err| ClientError::BaseUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token: None,
        })
    }

    /// Attaches the session token sent as `Authorization: Token ...` on
    /// every subsequent request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    // --- users ---

    /// Logs in and returns the issued token (and profile). The token is not
    /// stored here; persist it through [`Session`].
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(Method::POST, "users/login/", Some(&body), &[]).await
    }

    /// Registers a new account. Mirrors the original client: any failure
    /// reads as "not registered".
    pub async fn register(&self, payload: &RegisterRequest) -> bool {
        match self
            .send::<serde_json::Value>(Method::POST, "users/register/", Some(payload), &[])
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!("register failed: {err}");
                false
            }
        }
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.send::<serde_json::Value>(Method::POST, "users/logout/", Some(&()), &[])
            .await
            .map(|_| ())
    }

    // --- movements ---

    /// The authoritative dashboard snapshot: current balance plus recent
    /// movements.
    pub async fn scan_dashboard(&self, user_id: i64) -> ApiResponse<ScanDashboard> {
        let path = format!("movements/scan/dashboard/{user_id}/");
        match self.send(Method::GET, &path, NO_BODY, &[]).await {
            Ok(dashboard) => ApiResponse::ok("Dashboard cargado correctamente", dashboard),
            Err(err) => {
                tracing::warn!("scan dashboard failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    /// One page of the full movement history. Failures yield an empty page.
    pub async fn all_movements(
        &self,
        user_id: i64,
        page: u32,
        page_size: u32,
    ) -> ApiResponse<MovementsPage> {
        let path = format!("movements/scan/all/{user_id}/");
        let query = [
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        match self.send(Method::GET, &path, NO_BODY, &query).await {
            Ok(page) => ApiResponse::ok("Movimientos obtenidos correctamente", page),
            Err(err) => {
                tracing::warn!("movements page failed: {err}");
                let mut fallback = ApiResponse::failure(err.to_string());
                fallback.data = Some(MovementsPage::empty(page, page_size));
                fallback
            }
        }
    }

    pub async fn create_expense(&self, payload: &ExpenseCreate) -> ApiResponse<RawExpense> {
        match self
            .send::<ExpenseCreated>(Method::POST, "movements/expense/create/", Some(payload), &[])
            .await
        {
            Ok(created) => ApiResponse::ok(created.message, created.expense),
            Err(err) => {
                tracing::warn!("create expense failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    pub async fn create_income(&self, payload: &IncomeCreate) -> ApiResponse<RawIncome> {
        match self
            .send::<IncomeCreated>(Method::POST, "movements/income/create/", Some(payload), &[])
            .await
        {
            Ok(created) => ApiResponse::ok(created.message, created.income),
            Err(err) => {
                tracing::warn!("create income failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    pub async fn delete_expense(&self, id: i64) -> ApiResponse<()> {
        self.delete(&format!("movements/expense/delete/{id}/"), "Gasto eliminado exitosamente")
            .await
    }

    pub async fn delete_income(&self, id: i64) -> ApiResponse<()> {
        self.delete(&format!("movements/income/delete/{id}/"), "Ingreso eliminado exitosamente")
            .await
    }

    // --- balances ---

    pub async fn user_balance(&self, user_id: i64) -> ApiResponse<MonthlyIncomeResponse> {
        let query = [("user_id", user_id.to_string())];
        match self.send(Method::GET, "balances/user-balance/", NO_BODY, &query).await {
            Ok(balance) => ApiResponse::ok("", balance),
            Err(err) => {
                tracing::warn!("user balance failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    pub async fn update_monthly_income(&self, payload: &UpdateMonthlyIncome) -> ApiResponse<()> {
        match self
            .send::<serde_json::Value>(
                Method::PATCH,
                "balances/update-monthly-income/",
                Some(payload),
                &[],
            )
            .await
        {
            Ok(_) => ApiResponse::ok("Ingreso mensual actualizado", ()),
            Err(err) => {
                tracing::warn!("update monthly income failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    // --- recurring payments ---

    pub async fn recurring_payments(&self, user_id: i64) -> ApiResponse<Vec<RawRecurringPayment>> {
        let path = format!("alerts/recurring-payments/{user_id}/");
        match self.send(Method::GET, &path, NO_BODY, &[]).await {
            Ok(payments) => ApiResponse::ok("", payments),
            Err(err) => {
                tracing::warn!("recurring payments failed: {err}");
                let mut fallback = ApiResponse::failure(err.to_string());
                fallback.data = Some(Vec::new());
                fallback
            }
        }
    }

    pub async fn create_recurring_payment(
        &self,
        payload: &RecurringPaymentCreate,
    ) -> ApiResponse<RawRecurringPayment> {
        match self
            .send::<ApiResponse<RawRecurringPayment>>(
                Method::POST,
                "alerts/recurring-payments/create/",
                Some(payload),
                &[],
            )
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("create recurring payment failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    pub async fn delete_recurring_payment(&self, id: i64) -> ApiResponse<()> {
        self.delete(
            &format!("alerts/recurring-payments/delete/{id}/"),
            "Alerta eliminada exitosamente",
        )
        .await
    }

    // --- alerts ---

    /// One page of the notification feed. Failures yield the empty page
    /// shape with `unread_count = 0`.
    pub async fn user_alerts(
        &self,
        user_id: i64,
        page: u32,
        page_size: u32,
        seen: Option<bool>,
    ) -> AlertsPage {
        let mut query = vec![
            ("user_id", user_id.to_string()),
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(seen) = seen {
            query.push(("seen", seen.to_string()));
        }
        match self
            .send(Method::GET, "alerts/user-alerts-pagination/", NO_BODY, &query)
            .await
        {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!("user alerts failed: {err}");
                AlertsPage::empty(page_size)
            }
        }
    }

    pub async fn mark_alert_seen(&self, user_id: i64, alert_id: i64) -> ApiResponse<()> {
        let path = format!("alerts/mark-seen/{user_id}/{alert_id}/");
        match self
            .send::<serde_json::Value>(Method::PATCH, &path, Some(&()), &[])
            .await
        {
            Ok(_) => ApiResponse::ok("", ()),
            Err(err) => {
                tracing::warn!("mark alert seen failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    pub async fn mark_all_risk_seen(&self, user_id: i64) -> ApiResponse<()> {
        let path = format!("alerts/mark-all-risk-seen/{user_id}/");
        match self
            .send::<serde_json::Value>(Method::PATCH, &path, Some(&()), &[])
            .await
        {
            Ok(_) => ApiResponse::ok("", ()),
            Err(err) => {
                tracing::warn!("mark all risk seen failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    // --- plumbing ---

    async fn delete(&self, path: &str, success_message: &str) -> ApiResponse<()> {
        match self
            .send::<serde_json::Value>(Method::DELETE, path, NO_BODY, &[])
            .await
        {
            Ok(_) => ApiResponse::ok(success_message, ()),
            Err(err) => {
                tracing::warn!("delete {path} failed: {err}");
                ApiResponse::failure(err.to_string())
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::BaseUrl(err.to_string()))?;

        let mut request = self.http.request(method, endpoint);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            // Some endpoints (deletes) answer 204 with an empty body.
            if status == StatusCode::NO_CONTENT {
                return serde_json::from_value(serde_json::Value::Null)
                    .map_err(|err| ClientError::Server(err.to_string()));
            }
            return response.json::<T>().await.map_err(ClientError::Transport);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or_else(|| "unknown error".to_string());

        Err(match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            400 | 422 => ClientError::Validation(message),
            _ => ClientError::Server(message),
        })
    }
}

/// Explicit `None` body for requests without one; keeps `send` callers from
/// annotating the unused serialize type.
const NO_BODY: Option<&()> = None;
