use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use anyhow::Result;

use super::QueryCache;
use crate::domain::models::Amount;
use crate::domain::models::CacheKey;
use crate::domain::models::RequestError;
use crate::domain::models::Wallet;
use crate::domain::models::WalletData;

fn wallet(balance: f64) -> Wallet {
    return Wallet {
        message: None,
        data: WalletData {
            total_balance: Amount::Number(balance),
        },
    };
}

#[tokio::test]
async fn it_fetches_once_while_fresh() -> Result<()> {
    let cache = QueryCache::default();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let res = cache
            .get_or_fetch(CacheKey::Wallet, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                return Ok(wallet(10.0));
            })
            .await?;
        assert_eq!(res, wallet(10.0));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    return Ok(());
}

#[tokio::test]
async fn it_refetches_after_invalidation() -> Result<()> {
    let cache = QueryCache::default();
    cache.set(CacheKey::Wallet, &wallet(10.0));
    assert!(!cache.is_stale(&CacheKey::Wallet));

    cache.invalidate(&CacheKey::Wallet);
    assert!(cache.is_stale(&CacheKey::Wallet));
    assert_eq!(cache.get::<Wallet>(&CacheKey::Wallet), None);

    let res = cache
        .get_or_fetch(CacheKey::Wallet, || async { return Ok(wallet(20.0)) })
        .await?;
    assert_eq!(res, wallet(20.0));
    assert!(!cache.is_stale(&CacheKey::Wallet));
    return Ok(());
}

#[tokio::test]
async fn it_keeps_stale_entries_when_the_refetch_fails() {
    let cache = QueryCache::default();
    cache.set(CacheKey::Wallet, &wallet(10.0));
    cache.invalidate(&CacheKey::Wallet);

    let err = cache
        .get_or_fetch::<Wallet, _, _>(CacheKey::Wallet, || async {
            return Err(RequestError::from_parts(Some(500), None, "boom"));
        })
        .await
        .unwrap_err();

    assert_eq!(err.message, "boom".to_string());
    assert!(cache.is_stale(&CacheKey::Wallet));
}

#[test]
fn it_keeps_keys_apart() {
    let cache = QueryCache::default();
    cache.set(
        CacheKey::TransactionsByDay("2026-10-18".to_string(), "all".to_string()),
        &vec![1, 2],
    );

    cache.invalidate(&CacheKey::TransactionsByDay(
        "2026-10-17".to_string(),
        "all".to_string(),
    ));
    let res = cache.get::<Vec<i32>>(&CacheKey::TransactionsByDay(
        "2026-10-18".to_string(),
        "all".to_string(),
    ));

    assert_eq!(res, Some(vec![1, 2]));
    assert!(cache.is_stale(&CacheKey::Me));
}
