use std::sync::Arc;

use anyhow::Result;
use mockito::Matcher;
use test_utils::profile_fixture;
use test_utils::transactions_fixture;
use test_utils::wallet_fixture;

use super::format_transaction;
use super::is_verification_code;
use super::load_home;
use super::login;
use super::render_home;
use super::render_schedule;
use super::verify;
use super::HomeView;
use crate::application::App;
use crate::application::Screen;
use crate::domain::models::Route;
use crate::domain::models::TransactionFilter;
use crate::domain::models::TransactionList;
use crate::domain::models::User;
use crate::domain::services::QueryCache;
use crate::domain::services::SessionStore;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::SaviApi;
use crate::infrastructure::storage::memory::MemoryStorage;

async fn app(url: &str, signed_in: bool) -> Result<App> {
    let session = SessionStore::new(Box::<MemoryStorage>::default());
    session.hydrate().await;
    if signed_in {
        session.set_credentials(User::new("self", "lan@example.com"), "abc");
    }

    let api = SaviApi::new(ApiClient::new(url, session.clone())?);
    return Ok(App::new(
        session,
        Arc::new(api),
        Arc::new(QueryCache::default()),
    ));
}

fn home_view() -> Result<HomeView> {
    return Ok(HomeView {
        profile: serde_json::from_str(profile_fixture())?,
        wallet: serde_json::from_str(wallet_fixture())?,
        today: serde_json::from_str::<TransactionList>(transactions_fixture())?.into_vec(),
    });
}

#[test]
fn it_accepts_only_six_digit_codes() {
    assert!(is_verification_code("123456"));
    assert!(!is_verification_code("12345"));
    assert!(!is_verification_code("1234567"));
    assert!(!is_verification_code("12a456"));
    assert!(!is_verification_code("１２３４５６"));
}

#[test]
fn it_formats_transactions() -> Result<()> {
    let view = home_view()?;
    insta::assert_snapshot!(format_transaction(&view.today[0]), @"-20.000 VND | Ăn uống | mua cà phê | 2026-10-18");
    insta::assert_snapshot!(format_transaction(&view.today[1]), @"+5.000.000 VND | Lương | lương | 2026-10-18");
    insta::assert_snapshot!(format_transaction(&view.today[2]), @"-0 VND | Uncategorized | không rõ");
    return Ok(());
}

#[test]
fn it_renders_home() -> Result<()> {
    insta::assert_snapshot!(render_home(&home_view()?), @r###"
    Hi lan
    Balance: 1.250.000 VND

    Today
      -20.000 VND | Ăn uống | mua cà phê | 2026-10-18
      +5.000.000 VND | Lương | lương | 2026-10-18
      -0 VND | Uncategorized | không rõ
    "###);
    return Ok(());
}

#[test]
fn it_renders_a_day_with_totals() -> Result<()> {
    let items = home_view()?.today;
    insta::assert_snapshot!(render_schedule("2026-10-18", TransactionFilter::All, &items), @r###"
    2026-10-18 (all)
    Income +5.000.000 VND | Expense -20.000 VND | Net 4.980.000 VND

      -20.000 VND | Ăn uống | mua cà phê | 2026-10-18
      +5.000.000 VND | Lương | lương | 2026-10-18
      -0 VND | Uncategorized | không rõ
    "###);
    return Ok(());
}

#[test]
fn it_renders_an_empty_day() {
    insta::assert_snapshot!(render_schedule("2026-10-17", TransactionFilter::Income, &[]), @r###"
    2026-10-17 (income)
    Income +0 VND | Expense -0 VND | Net 0 VND

      No transactions
    "###);
}

#[tokio::test]
async fn it_loads_home_once_while_fresh() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let profile = server
        .mock("GET", "/auth/profile")
        .with_status(200)
        .with_body(profile_fixture())
        .expect(1)
        .create_async()
        .await;
    let wallet = server
        .mock("GET", "/wallet")
        .with_status(200)
        .with_body(wallet_fixture())
        .expect(1)
        .create_async()
        .await;
    let today = server
        .mock("GET", "/transaction/u-42/transactions")
        .match_query(Matcher::UrlEncoded(
            "createdAtStart".to_string(),
            "2026-10-18".to_string(),
        ))
        .with_status(200)
        .with_body(transactions_fixture())
        .expect(1)
        .create_async()
        .await;

    let app = app(&server.url(), true).await?;
    let first = load_home(&app, "2026-10-18").await?;
    let second = load_home(&app, "2026-10-18").await?;

    assert_eq!(first, second);
    assert_eq!(first, home_view()?);
    profile.assert_async().await;
    wallet.assert_async().await;
    today.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_stores_the_session_after_login() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(201)
        .with_body(r#"{"access_token":"t-1"}"#)
        .create_async()
        .await;

    let app = app(&server.url(), false).await?;
    let next = login(
        &app,
        Some("lan@example.com".to_string()),
        Some("pw".to_string()),
    )
    .await?;

    assert_eq!(next, Some(Screen::Home));
    let session = app.session.current();
    assert_eq!(session.credential(), Some("t-1"));
    assert_eq!(session.user().unwrap().user_name, "lan@example.com".to_string());
    return Ok(());
}

#[tokio::test]
async fn it_stays_signed_out_without_a_token() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let app = app(&server.url(), false).await?;
    let next = login(
        &app,
        Some("lan@example.com".to_string()),
        Some("pw".to_string()),
    )
    .await?;

    assert_eq!(next, None);
    assert!(!app.session.current().is_authenticated());
    return Ok(());
}

#[tokio::test]
async fn it_refuses_malformed_codes_without_calling_the_server() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/user/verify")
        .expect(0)
        .create_async()
        .await;

    let app = app(&server.url(), false).await?;
    let next = verify(&app, Some("12345".to_string())).await?;

    assert_eq!(next, None);
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_signs_in_after_verification_with_a_token() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/user/verify")
        .with_status(201)
        .with_body(r#"{"access_token":"t-2"}"#)
        .create_async()
        .await;

    let app = app(&server.url(), false).await?;
    let next = verify(&app, Some("123456".to_string())).await?;

    assert_eq!(next, Some(Screen::from(Route::Login)));
    assert_eq!(app.session.credential(), Some("t-2".to_string()));
    return Ok(());
}

#[tokio::test]
async fn it_returns_to_login_when_home_finds_the_session_expired() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/profile")
        .with_status(401)
        .create_async()
        .await;

    let app = app(&server.url(), true).await?;
    let next = super::home(&app).await?;

    assert_eq!(next, Some(Screen::from(Route::Login)));
    assert!(!app.session.current().is_authenticated());
    return Ok(());
}
