#[cfg(test)]
#[path = "screens_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use dialoguer::Password;
use yansi::Paint;

use super::toast;
use super::App;
use super::Screen;
use crate::domain::models::format_amount;
use crate::domain::models::CacheKey;
use crate::domain::models::Notification;
use crate::domain::models::Profile;
use crate::domain::models::RequestError;
use crate::domain::models::Route;
use crate::domain::models::Submitter;
use crate::domain::models::Totals;
use crate::domain::models::Transaction;
use crate::domain::models::TransactionFilter;
use crate::domain::models::TransactionQuery;
use crate::domain::models::User;
use crate::domain::models::Wallet;
use crate::domain::services::Submissions;

const VERIFICATION_CODE_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct HomeView {
    pub profile: Profile,
    pub wallet: Wallet,
    pub today: Vec<Transaction>,
}

pub fn today() -> String {
    return chrono::Local::now().format("%Y-%m-%d").to_string();
}

pub fn is_verification_code(code: &str) -> bool {
    return code.len() == VERIFICATION_CODE_LEN && code.chars().all(|e| return e.is_ascii_digit());
}

fn prompt_input(label: &str) -> Result<String> {
    let res = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .interact_text()?;
    return Ok(res.trim().to_string());
}

fn prompt_password() -> Result<String> {
    let res = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;
    return Ok(res);
}

/// Tells the user about a failed request. A rejected credential has already
/// ended the session, so the user is sent back to login.
fn failed(title: &str, err: &RequestError) -> Option<Screen> {
    toast::show(&Notification::request_failed(title, err));
    if err.is_session_expired() {
        return Some(Screen::from(Route::Login));
    }

    return None;
}

pub async fn login(
    app: &App,
    email: Option<String>,
    password: Option<String>,
) -> Result<Option<Screen>> {
    let email = match email {
        Some(email) => email,
        None => prompt_input("Email")?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let res = match app.api.login(&email, &password).await {
        Ok(res) => res,
        Err(err) => {
            toast::show(&Notification::request_failed("Login failed", &err));
            return Ok(None);
        }
    };

    let token = match res.access_token.filter(|e| return !e.is_empty()) {
        Some(token) => token,
        None => {
            toast::show(&Notification::error("Login failed", Some("Missing token")));
            return Ok(None);
        }
    };

    let mut user_name = email.as_str();
    if user_name.is_empty() {
        user_name = "user";
    }
    app.session
        .set_credentials(User::new("self", user_name), &token);
    toast::show(&Notification::success("Login successful"));

    return Ok(Some(Screen::Home));
}

pub async fn signup(
    app: &App,
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<Option<Screen>> {
    let full_name = match full_name {
        Some(full_name) => full_name,
        None => prompt_input("Full name")?,
    };
    let email = match email {
        Some(email) => email,
        None => prompt_input("Email")?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    if let Err(err) = app.api.signup(&full_name, &email, &password).await {
        toast::show(&Notification::request_failed("Sign up failed", &err));
        return Ok(None);
    }

    toast::show(&Notification::info("User created", Some("Please verify")));
    return Ok(Some(Screen::Verify { code: None }));
}

pub async fn verify(app: &App, code: Option<String>) -> Result<Option<Screen>> {
    let code = match code {
        Some(code) => code.trim().to_string(),
        None => prompt_input("6 digit code sent to your email")?,
    };

    if !is_verification_code(&code) {
        toast::show(&Notification::error(
            "Verification failed",
            Some("The code must be exactly 6 digits"),
        ));
        return Ok(None);
    }

    let res = match app.api.verify(&code).await {
        Ok(res) => res,
        Err(err) => {
            toast::show(&Notification::request_failed("Verification failed", &err));
            return Ok(None);
        }
    };

    if let Some(token) = res.access_token.filter(|e| return !e.is_empty()) {
        app.session.set_credentials(User::new("self", "user"), &token);
    }
    toast::show(&Notification::success("Verified successfully"));

    return Ok(Some(Screen::from(Route::Login)));
}

pub async fn load_profile(app: &App) -> Result<Profile, RequestError> {
    return app
        .cache
        .get_or_fetch(CacheKey::Me, || return app.api.profile())
        .await;
}

pub async fn load_home(app: &App, day: &str) -> Result<HomeView, RequestError> {
    let profile = load_profile(app).await?;
    let wallet = app
        .cache
        .get_or_fetch(CacheKey::Wallet, || return app.api.wallet())
        .await?;

    let query = TransactionQuery {
        created_at_start: Some(day.to_string()),
        ..TransactionQuery::default()
    };
    let today = app
        .cache
        .get_or_fetch(CacheKey::TransactionsToday, || {
            return app.api.transactions(&profile.user_id, &query);
        })
        .await?;

    return Ok(HomeView {
        profile,
        wallet,
        today,
    });
}

pub async fn load_transactions(
    app: &App,
    query: &TransactionQuery,
) -> Result<Vec<Transaction>, RequestError> {
    let profile = load_profile(app).await?;
    let key = CacheKey::TransactionsList(format!(
        "{}|{}|{}",
        query.filter,
        query.start_date.as_deref().unwrap_or_default(),
        query.end_date.as_deref().unwrap_or_default()
    ));

    return app
        .cache
        .get_or_fetch(key, || {
            return app.api.transactions(&profile.user_id, query);
        })
        .await;
}

pub async fn load_schedule(
    app: &App,
    day: &str,
    filter: TransactionFilter,
) -> Result<Vec<Transaction>, RequestError> {
    let profile = load_profile(app).await?;
    let query = TransactionQuery {
        filter,
        created_at_start: Some(day.to_string()),
        ..TransactionQuery::default()
    };

    return app
        .cache
        .get_or_fetch(
            CacheKey::TransactionsByDay(day.to_string(), filter.to_string()),
            || return app.api.transactions(&profile.user_id, &query),
        )
        .await;
}

pub fn format_transaction(item: &Transaction) -> String {
    let mut sign = "-";
    if item.is_income() {
        sign = "+";
    }

    let mut parts = vec![
        format!("{sign}{} VND", format_amount(item.amount.value())),
        item.category_name
            .clone()
            .unwrap_or_else(|| return "Uncategorized".to_string()),
    ];
    if let Some(note) = item.note.as_ref().filter(|e| return !e.is_empty()) {
        parts.push(note.to_string());
    }
    if let Some(day) = item.day() {
        parts.push(day.to_string());
    }

    return parts.join(" | ");
}

pub fn render_list(items: &[Transaction]) -> String {
    if items.is_empty() {
        return "  No transactions".to_string();
    }

    return items
        .iter()
        .map(|e| return format!("  {}", format_transaction(e)))
        .collect::<Vec<String>>()
        .join("\n");
}

pub fn render_home(view: &HomeView) -> String {
    return [
        format!("Hi {}", view.profile.username),
        format!(
            "Balance: {} VND",
            format_amount(view.wallet.data.total_balance.value())
        ),
        "".to_string(),
        "Today".to_string(),
        render_list(&view.today),
    ]
    .join("\n");
}

pub fn render_totals(totals: &Totals) -> String {
    return format!(
        "Income +{} VND | Expense -{} VND | Net {} VND",
        format_amount(totals.income),
        format_amount(totals.expense),
        format_amount(totals.total)
    );
}

pub fn render_schedule(day: &str, filter: TransactionFilter, items: &[Transaction]) -> String {
    return [
        format!("{day} ({filter})"),
        render_totals(&Totals::from_transactions(items)),
        "".to_string(),
        render_list(items),
    ]
    .join("\n");
}

pub async fn home(app: &App) -> Result<Option<Screen>> {
    match load_home(app, &today()).await {
        Ok(view) => {
            println!("{}", render_home(&view));
            return Ok(None);
        }
        Err(err) => return Ok(failed("Could not load home", &err)),
    }
}

pub async fn transactions(app: &App, query: &TransactionQuery) -> Result<Option<Screen>> {
    match load_transactions(app, query).await {
        Ok(items) => {
            println!("{}", Paint::new(format!("Transactions ({})", query.filter)).bold());
            println!("{}", render_list(&items));
            return Ok(None);
        }
        Err(err) => return Ok(failed("Could not load transactions", &err)),
    }
}

pub async fn schedule(
    app: &App,
    date: Option<String>,
    filter: TransactionFilter,
) -> Result<Option<Screen>> {
    let day = date.unwrap_or_else(today);
    if NaiveDate::parse_from_str(&day, "%Y-%m-%d").is_err() {
        bail!(format!("Invalid date '{day}', expected YYYY-MM-DD"));
    }

    match load_schedule(app, &day, filter).await {
        Ok(items) => {
            println!("{}", render_schedule(&day, filter, &items));
            return Ok(None);
        }
        Err(err) => return Ok(failed("Could not load schedule", &err)),
    }
}

/// Submits typed text through the same pipeline the voice capture uses.
pub async fn add_text(app: &App, text: &str) -> Result<Option<Screen>> {
    if text.trim().is_empty() {
        toast::show(&Notification::error("Create failed", Some("Nothing to submit")));
        return Ok(None);
    }

    let submissions = Submissions::new(app.api.clone(), app.cache.clone());
    if let Err(err) = submissions.submit(text).await {
        return Ok(failed("Create failed", &err));
    }
    toast::show(&Notification::success("Transaction created"));

    match app
        .cache
        .get_or_fetch(CacheKey::Wallet, || return app.api.wallet())
        .await
    {
        Ok(wallet) => println!(
            "Balance: {} VND",
            format_amount(wallet.data.total_balance.value())
        ),
        Err(err) => tracing::warn!(error = ?err, "Failed to refresh the balance"),
    }

    return Ok(None);
}
