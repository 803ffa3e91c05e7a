use anyhow::Result;

use super::resolve;
use super::Screen;
use crate::domain::models::Route;
use crate::domain::models::Session;
use crate::domain::models::User;
use crate::domain::services::SessionStore;
use crate::infrastructure::storage::memory::MemoryStorage;

async fn session(signed_in: bool) -> Session {
    let store = SessionStore::new(Box::<MemoryStorage>::default());
    store.hydrate().await;
    if signed_in {
        store.set_credentials(User::new("self", "lan@example.com"), "abc");
    }
    return store.current();
}

#[tokio::test]
async fn it_sends_signed_out_users_to_login() -> Result<()> {
    let session = session(false).await;
    let res = resolve(&session, Screen::Add {
        text: Some("mua cà phê 20000".to_string()),
    })?;

    assert_eq!(res, Screen::from(Route::Login));
    return Ok(());
}

#[tokio::test]
async fn it_sends_signed_in_users_home() -> Result<()> {
    let session = session(true).await;
    let res = resolve(&session, Screen::Verify {
        code: Some("123456".to_string()),
    })?;

    assert_eq!(res, Screen::Home);
    return Ok(());
}

#[tokio::test]
async fn it_keeps_screens_of_the_right_area() -> Result<()> {
    let signed_out = session(false).await;
    let signup = Screen::from(Route::Signup);
    assert_eq!(resolve(&signed_out, signup.clone())?, signup);

    let signed_in = session(true).await;
    let add = Screen::Add {
        text: Some("lương 5000000".to_string()),
    };
    assert_eq!(resolve(&signed_in, add.clone())?, add);
    return Ok(());
}

#[test]
fn it_refuses_to_route_before_hydration() {
    let res = resolve(&Session::default(), Screen::Home);
    assert!(res.is_err());
}

#[test]
fn it_maps_every_route_to_its_screen() {
    for route in [
        Route::Login,
        Route::Signup,
        Route::Verify,
        Route::Home,
        Route::Transactions,
        Route::Schedule,
        Route::Add,
    ] {
        assert_eq!(Screen::from(route).route(), route);
    }
}
