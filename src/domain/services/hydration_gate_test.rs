use std::time::Duration;

use anyhow::Result;

use super::HydrationGate;
use crate::domain::models::Area;
use crate::domain::models::GateDecision;
use crate::domain::models::Route;
use crate::domain::models::User;
use crate::domain::services::SessionStore;
use crate::infrastructure::storage::memory::MemoryStorage;

#[test]
fn it_waits_until_hydrated_for_any_session() {
    for has_credential in [false, true] {
        for area in [Area::Unauthenticated, Area::Authenticated] {
            assert_eq!(
                HydrationGate::decide(false, has_credential, area),
                GateDecision::Wait
            );
        }
    }
}

#[test]
fn it_redirects_guests_to_login() {
    assert_eq!(
        HydrationGate::decide(true, false, Area::Authenticated),
        GateDecision::Redirect(Route::Login)
    );
    assert_eq!(
        HydrationGate::decide(true, false, Area::Unauthenticated),
        GateDecision::Stay
    );
}

#[test]
fn it_redirects_signed_in_users_home() {
    assert_eq!(
        HydrationGate::decide(true, true, Area::Unauthenticated),
        GateDecision::Redirect(Route::Home)
    );
    assert_eq!(
        HydrationGate::decide(true, true, Area::Authenticated),
        GateDecision::Stay
    );
}

#[tokio::test]
async fn it_resolves_the_entry_route() {
    let store = SessionStore::new(Box::<MemoryStorage>::default());
    assert_eq!(HydrationGate::entry_route(&store.current()), None);

    store.hydrate().await;
    assert_eq!(
        HydrationGate::entry_route(&store.current()),
        Some(Route::Login)
    );

    store.set_credentials(User::new("self", "lan"), "abc");
    assert_eq!(
        HydrationGate::entry_route(&store.current()),
        Some(Route::Home)
    );
}

#[tokio::test]
async fn it_sends_a_fresh_login_home() {
    let store = SessionStore::new(Box::<MemoryStorage>::default());
    store.hydrate().await;
    assert_eq!(
        HydrationGate::evaluate(&store.current(), Area::Unauthenticated),
        GateDecision::Stay
    );

    store.set_credentials(User::new("self", "lan"), "abc");

    assert_eq!(store.credential(), Some("abc".to_string()));
    assert_eq!(
        HydrationGate::evaluate(&store.current(), Area::Unauthenticated),
        GateDecision::Redirect(Route::Home)
    );
}

#[tokio::test]
async fn it_watches_for_a_forced_logout() -> Result<()> {
    let store = SessionStore::new(Box::<MemoryStorage>::default());
    store.hydrate().await;
    store.set_credentials(User::new("self", "lan"), "abc");

    let mut rx = store.subscribe();
    let watcher = tokio::spawn(async move {
        return HydrationGate::watch(&mut rx, Area::Authenticated).await;
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!watcher.is_finished());

    store.logout();
    let route = watcher.await??;
    assert_eq!(route, Route::Login);

    return Ok(());
}
