use std::error::Error;

use api_types::{
    balance::UpdateMonthlyIncome,
    movement::{ExpenseCreate, IncomeCreate},
    recurring::RecurringPaymentCreate,
    user::RegisterRequest,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use client::{Client, Session};
use ledger::{
    Amount, Category, DateRange, DayGroup, Ledger, Movement, MovementKind, Notification,
    NotificationFeed, Recurrence, RecurringPayment, Urgency, displayed_groups, group_by_date,
};

use crate::{config::AppConfig, prompt};

pub type CommandResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Everything a command needs: HTTP client, session context and settings.
pub struct Context {
    pub client: Client,
    pub session: Session,
    pub settings: AppConfig,
    pub tz: Tz,
}

impl Context {
    /// "Today" in the configured timezone. Date filters work on calendar
    /// dates, so resolving this in the wrong zone would shift the "today"
    /// bucket by a day.
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    fn now_time(&self) -> NaiveTime {
        Utc::now().with_timezone(&self.tz).time()
    }

    fn require_user_id(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        self.session
            .user_id()
            .ok_or_else(|| "no hay sesión activa, usa `monedero login`".into())
    }

    /// Seeds a ledger from the authoritative dashboard snapshot. On a failed
    /// fetch the ledger stays empty, matching the app's empty-state
    /// rendering.
    async fn seed_ledger(&self, user_id: i64) -> Ledger {
        let response = self.client.scan_dashboard(user_id).await;
        let mut ledger = Ledger::new();
        match response.data {
            Some(dashboard) => {
                let movements = dashboard
                    .recent_movements
                    .into_iter()
                    .map(Movement::from)
                    .collect();
                ledger.initialize(
                    Amount::new(dashboard.current_balance_cents),
                    movements,
                    dashboard.total_movements,
                );
            }
            None => tracing::warn!("dashboard no disponible: {}", response.message),
        }
        ledger
    }
}

// --- session ---

pub async fn login(ctx: &mut Context, email: &str) -> CommandResult {
    let password = prompt::password("Contraseña: ")?;
    let response = ctx.client.login(email, &password).await?;

    let Some(token) = response.token else {
        return Err("credenciales inválidas".into());
    };
    ctx.session.token = Some(token);
    ctx.session.user = response.user;
    ctx.session.save(&ctx.settings.session_path)?;

    match &ctx.session.user {
        Some(user) => println!("Sesión iniciada como {} {}.", user.first_name, user.last_name),
        None => println!("Sesión iniciada."),
    }
    Ok(())
}

pub async fn logout(ctx: &mut Context) -> CommandResult {
    if ctx.session.is_logged_in()
        && let Err(err) = ctx.client.logout().await
    {
        tracing::warn!("logout remoto falló: {err}");
    }
    ctx.session.clear(&ctx.settings.session_path)?;
    println!("Sesión cerrada.");
    Ok(())
}

pub async fn register(
    ctx: &Context,
    email: &str,
    first_name: &str,
    last_name: &str,
    birth_date: Option<NaiveDate>,
    gender: Option<String>,
) -> CommandResult {
    let password = prompt::password_twice()?;
    let payload = RegisterRequest {
        email: email.to_string(),
        password,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date,
        gender,
    };

    if ctx.client.register(&payload).await {
        println!("Cuenta creada. Inicia sesión con `monedero login --email {email}`.");
        Ok(())
    } else {
        Err("no se pudo crear la cuenta".into())
    }
}

// --- movements ---

pub async fn dashboard(ctx: &Context) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let response = ctx.client.scan_dashboard(user_id).await;
    let Some(snapshot) = response.data else {
        return Err(response.message.into());
    };

    let mut ledger = Ledger::new();
    let movements = snapshot
        .recent_movements
        .into_iter()
        .map(Movement::from)
        .collect();
    ledger.initialize(
        Amount::new(snapshot.current_balance_cents),
        movements,
        snapshot.total_movements,
    );

    println!("Balance actual: {}", ledger.balance());
    println!(
        "{} de {} movimientos cargados",
        ledger.len(),
        ledger.total_movements()
    );
    print_groups(&group_by_date(ledger.movements()));
    Ok(())
}

pub async fn movements(ctx: &Context, search: &str, range: &str, pages: u32) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let range: DateRange = range.parse()?;

    let mut ledger = ctx.seed_ledger(user_id).await;

    // Dashboard counts as page 1; merge further pages up to the limit.
    let mut fetched = 0;
    while fetched < pages.saturating_sub(1) {
        let Some(page) = ledger.next_page() else { break };
        let response = ctx
            .client
            .all_movements(user_id, page, ctx.settings.page_size)
            .await;
        let Some(data) = response.data else { break };
        let movements = data.movements.into_iter().map(Movement::from).collect();
        ledger.merge_page(movements, data.has_more, data.next_page);
        fetched += 1;
    }

    let groups = displayed_groups(ledger.movements(), search, range, ctx.today());
    let shown: usize = groups.iter().map(|g| g.movements.len()).sum();

    println!("Balance actual: {}", ledger.balance());
    println!(
        "Mostrando {shown} de {} movimientos (filtro: {})",
        ledger.total_movements(),
        range.key()
    );
    print_groups(&groups);
    Ok(())
}

pub async fn add_expense(
    ctx: &Context,
    place: &str,
    total: &str,
    category: &str,
    date: Option<NaiveDate>,
    time: Option<String>,
    comment: Option<String>,
) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let amount: Amount = total.parse()?;
    if !amount.is_positive() {
        return Err("el monto debe ser mayor a cero".into());
    }
    let category = Category::parse(category)
        .ok_or_else(|| format!("categoría desconocida: {category}"))?;
    let date = date.unwrap_or_else(|| ctx.today());
    let time = match time {
        Some(raw) => parse_time(&raw)?,
        None => ctx.now_time(),
    };

    // Seed before creating so the new balance prints optimistically,
    // without a second dashboard fetch.
    let mut ledger = ctx.seed_ledger(user_id).await;

    let payload = ExpenseCreate {
        user_id,
        category: category.as_str().to_string(),
        place: place.to_string(),
        date,
        time,
        total_cents: amount.cents(),
        comment,
    };
    let response = ctx.client.create_expense(&payload).await;
    let Some(raw) = response.data else {
        return Err(response.message.into());
    };

    ledger.insert(Movement::from(raw));
    report_mutation(&response.message, "Gasto creado exitosamente", &ledger);
    Ok(())
}

pub async fn add_income(
    ctx: &Context,
    title: &str,
    total: &str,
    date: Option<NaiveDate>,
    time: Option<String>,
    comment: Option<String>,
) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let amount: Amount = total.parse()?;
    if !amount.is_positive() {
        return Err("el monto debe ser mayor a cero".into());
    }
    let date = date.unwrap_or_else(|| ctx.today());
    let time = match time {
        Some(raw) => parse_time(&raw)?,
        None => ctx.now_time(),
    };

    let mut ledger = ctx.seed_ledger(user_id).await;

    let payload = IncomeCreate {
        user_id,
        title: title.to_string(),
        date,
        time,
        total_cents: amount.cents(),
        comment,
    };
    let response = ctx.client.create_income(&payload).await;
    let Some(raw) = response.data else {
        return Err(response.message.into());
    };

    ledger.insert(Movement::from(raw));
    report_mutation(&response.message, "Ingreso creado exitosamente", &ledger);
    Ok(())
}

pub async fn delete(ctx: &Context, kind: &str, id: i64) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let kind = MovementKind::try_from(kind)?;

    let mut ledger = ctx.seed_ledger(user_id).await;
    if let Some(movement) = ledger.get(kind, id)
        && !movement.deletable(Utc::now())
    {
        return Err("el periodo para eliminar este movimiento ya venció".into());
    }

    let response = match kind {
        MovementKind::Expense => ctx.client.delete_expense(id).await,
        MovementKind::Income => ctx.client.delete_income(id).await,
    };
    if !response.success {
        return Err(response.message.into());
    }

    println!("{}", response.message);
    // The movement may not be in the recent window; the balance only moves
    // when it was.
    if ledger.remove(kind, id).is_some() {
        println!("Balance actual: {}", ledger.balance());
    }
    Ok(())
}

// --- balances ---

pub async fn set_monthly_income(ctx: &Context, total: &str) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let amount: Amount = total.parse()?;
    if amount.is_negative() {
        return Err("el ingreso mensual no puede ser negativo".into());
    }

    let payload = UpdateMonthlyIncome {
        user_id,
        new_monthly_income_cents: amount.cents(),
    };
    let response = ctx.client.update_monthly_income(&payload).await;
    if !response.success {
        return Err(response.message.into());
    }
    println!("{}", response.message);

    let balance = ctx.client.user_balance(user_id).await;
    if let Some(body) = balance.data {
        if let Some(monthly) = body.monthly_income {
            println!("Ingreso mensual: {}", Amount::new(monthly));
        }
        if let Some(current) = body.current_balance {
            println!("Balance actual: {}", Amount::new(current));
        }
    }
    Ok(())
}

// --- recurring payments ---

pub async fn recurring_list(ctx: &Context) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let today = ctx.today();

    let response = ctx.client.recurring_payments(user_id).await;
    if !response.success {
        tracing::warn!("pagos recurrentes no disponibles: {}", response.message);
    }
    let mut payments: Vec<RecurringPayment> = response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(RecurringPayment::from)
        .collect();

    if payments.is_empty() {
        println!("Sin pagos recurrentes.");
        return Ok(());
    }

    payments.sort_by_key(|p| p.days_until_due(today).unwrap_or(i64::MAX));
    for payment in &payments {
        let marker = match payment.urgency(today) {
            Urgency::Urgent => "[!]",
            Urgency::Warning => "[~]",
            Urgency::Normal => "   ",
        };
        match payment.next_due_date(today) {
            Some(due) => println!(
                "{marker} #{:<4} {:<28} {:>12}  vence {} ({} días)",
                payment.id,
                payment.name,
                payment.amount.to_string(),
                due,
                payment.days_until_due(today).unwrap_or_default()
            ),
            None => println!(
                "{marker} #{:<4} {:<28} {:>12}  inactivo",
                payment.id,
                payment.name,
                payment.amount.to_string()
            ),
        }
    }
    Ok(())
}

pub async fn recurring_add(
    ctx: &Context,
    name: &str,
    total: &str,
    category: &str,
    payment_day: u8,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let amount: Amount = total.parse()?;
    if !amount.is_positive() {
        return Err("el monto debe ser mayor a cero".into());
    }
    let category = Category::parse(category)
        .ok_or_else(|| format!("categoría desconocida: {category}"))?;
    if !(1..=31).contains(&payment_day) {
        return Err("payment_day debe estar entre 1 y 31".into());
    }

    let payload = RecurringPaymentCreate {
        user_id,
        name: name.to_string(),
        category: category.as_str().to_string(),
        amount_cents: amount.cents(),
        recurrence_type: Recurrence::Monthly.as_str().to_string(),
        payment_day,
        start_date: start_date.unwrap_or_else(|| ctx.today()),
        end_date,
    };
    let response = ctx.client.create_recurring_payment(&payload).await;
    if !response.success {
        return Err(response.message.into());
    }
    println!("Recordatorio creado: {name}");
    Ok(())
}

pub async fn recurring_remove(ctx: &Context, id: i64) -> CommandResult {
    ctx.require_user_id()?;
    let response = ctx.client.delete_recurring_payment(id).await;
    if !response.success {
        return Err(response.message.into());
    }
    println!("{}", response.message);
    Ok(())
}

// --- alerts ---

pub async fn alerts(ctx: &Context, unseen_only: bool) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let feed = fetch_feed(ctx, user_id, unseen_only).await;

    println!("{} alertas sin leer", feed.unread_count());
    for item in feed.items() {
        let marker = if item.seen { ' ' } else { '*' };
        println!(
            "{marker} #{:<4} [{:<7}] {:02}/{} {}",
            item.id,
            item.level.as_str(),
            item.target_month,
            item.target_year,
            item.message
        );
    }
    Ok(())
}

pub async fn alerts_mark_seen(ctx: &Context, id: i64) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let mut feed = fetch_feed(ctx, user_id, false).await;

    let response = ctx.client.mark_alert_seen(user_id, id).await;
    if !response.success {
        return Err(response.message.into());
    }
    feed.mark_seen(id);
    println!("Quedan {} alertas sin leer", feed.unread_count());
    Ok(())
}

pub async fn alerts_mark_all_risk_seen(ctx: &Context) -> CommandResult {
    let user_id = ctx.require_user_id()?;
    let mut feed = fetch_feed(ctx, user_id, false).await;

    let response = ctx.client.mark_all_risk_seen(user_id).await;
    if !response.success {
        return Err(response.message.into());
    }
    let transitioned = feed.mark_all_risk_seen();
    println!(
        "{transitioned} alertas de riesgo marcadas, quedan {} sin leer",
        feed.unread_count()
    );
    Ok(())
}

async fn fetch_feed(ctx: &Context, user_id: i64, unseen_only: bool) -> NotificationFeed {
    let page = ctx
        .client
        .user_alerts(user_id, 1, ctx.settings.page_size, unseen_only.then_some(false))
        .await;

    let mut feed = NotificationFeed::new();
    let items = page.data.into_iter().map(Notification::from).collect();
    feed.replace(
        items,
        page.unread_count,
        page.pagination.has_more,
        page.pagination.next_page,
    );
    feed
}

// --- rendering ---

fn print_groups(groups: &[DayGroup]) {
    if groups.is_empty() {
        println!("Sin movimientos.");
        return;
    }
    for group in groups {
        println!();
        println!("{}", group.date);
        for movement in &group.movements {
            let sign = match movement.kind {
                MovementKind::Expense => '-',
                MovementKind::Income => '+',
            };
            let category = movement
                .category
                .map(Category::label)
                .unwrap_or("Ingreso");
            println!(
                "  {sign} {:>12}  {:<5} #{:<4} {:<28} {}",
                movement.total.to_string(),
                movement.time.format("%H:%M"),
                movement.id,
                movement.title,
                category
            );
            if let Some(comment) = &movement.comment {
                println!("                 {comment}");
            }
        }
    }
}

fn report_mutation(message: &str, default_message: &str, ledger: &Ledger) {
    if message.is_empty() {
        println!("{default_message}");
    } else {
        println!("{message}");
    }
    println!("Balance actual: {}", ledger.balance());
}

fn parse_time(raw: &str) -> Result<NaiveTime, Box<dyn Error + Send + Sync>> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| format!("hora inválida: {raw}").into())
}
