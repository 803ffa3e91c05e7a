use anyhow::Result;
use mockito::Matcher;
use serde_json::json;
use test_utils::profile_fixture;
use test_utils::transactions_fixture;
use test_utils::wallet_fixture;

use super::SaviApi;
use crate::domain::models::TransactionFilter;
use crate::domain::models::TransactionQuery;
use crate::domain::models::User;
use crate::domain::services::SessionStore;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::storage::memory::MemoryStorage;

async fn api(url: &str) -> Result<SaviApi> {
    let store = SessionStore::new(Box::<MemoryStorage>::default());
    store.hydrate().await;
    store.set_credentials(User::new("self", "lan@example.com"), "abc");
    return Ok(SaviApi::new(ApiClient::new(url, store)?));
}

#[tokio::test]
async fn it_logs_in() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"email": "lan@example.com", "password": "pw"})))
        .with_status(201)
        .with_body(r#"{"access_token":"t-1"}"#)
        .create_async()
        .await;

    let api = api(&server.url()).await?;
    let res = api.login("lan@example.com", "pw").await?;

    assert_eq!(res.access_token, Some("t-1".to_string()));
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_signs_up() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/user/create")
        .match_body(Matcher::Json(json!({
            "fullName": "Lan Nguyen",
            "email": "lan@example.com",
            "password": "pw"
        })))
        .with_status(201)
        .with_body(r#"{"id":"u-42"}"#)
        .create_async()
        .await;

    let api = api(&server.url()).await?;
    api.signup("Lan Nguyen", "lan@example.com", "pw").await?;

    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_verifies_with_and_without_a_token() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/user/verify")
        .match_body(Matcher::Json(json!({"codeId": "123456"})))
        .with_status(201)
        .with_body(r#"{"access_token":"t-2"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/user/verify")
        .match_body(Matcher::Json(json!({"codeId": "654321"})))
        .with_status(201)
        .with_body(r#"{"message":"verified"}"#)
        .create_async()
        .await;

    let api = api(&server.url()).await?;
    assert_eq!(
        api.verify("123456").await?.access_token,
        Some("t-2".to_string())
    );
    assert_eq!(api.verify("654321").await?.access_token, None);
    return Ok(());
}

#[tokio::test]
async fn it_fetches_the_profile_and_wallet() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/profile")
        .with_status(200)
        .with_body(profile_fixture())
        .create_async()
        .await;
    server
        .mock("GET", "/wallet")
        .with_status(200)
        .with_body(wallet_fixture())
        .create_async()
        .await;

    let api = api(&server.url()).await?;
    assert_eq!(api.profile().await?.user_id, "u-42".to_string());
    assert_eq!(api.wallet().await?.data.total_balance.value(), 1250000.0);
    return Ok(());
}

#[tokio::test]
async fn it_creates_transactions_from_speech() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/transaction/ai-create")
        .match_header("authorization", "Bearer abc")
        .match_body(Matcher::Json(json!({"transcript": "mua cà phê 20000"})))
        .with_status(201)
        .with_body(r#"{"id":9,"amount":20000,"type":"EXPENSE"}"#)
        .create_async()
        .await;

    let api = api(&server.url()).await?;
    let res = api.create_transaction_from_speech("mua cà phê 20000").await?;

    assert_eq!(res["id"], json!(9));
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_lists_transactions_with_filters() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/transaction/u-42/transactions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".to_string(), "EXPENSE".to_string()),
            Matcher::UrlEncoded("startDate".to_string(), "2026-10-18".to_string()),
            Matcher::UrlEncoded("endDate".to_string(), "2026-10-18".to_string()),
        ]))
        .with_status(200)
        .with_body(transactions_fixture())
        .create_async()
        .await;

    let api = api(&server.url()).await?;
    let query = TransactionQuery {
        filter: TransactionFilter::Expense,
        start_date: Some("2026-10-18".to_string()),
        end_date: Some("2026-10-18".to_string()),
        ..TransactionQuery::default()
    };
    let res = api.transactions("u-42", &query).await?;

    assert_eq!(res.len(), 3);
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_omits_the_type_for_all_transactions() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/transaction/u-42/transactions")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let api = api(&server.url()).await?;
    let res = api
        .transactions("u-42", &TransactionQuery::default())
        .await?;

    assert!(res.is_empty());
    mock.assert_async().await;
    return Ok(());
}
