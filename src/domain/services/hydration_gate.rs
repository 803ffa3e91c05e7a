#[cfg(test)]
#[path = "hydration_gate_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::watch;

use crate::domain::models::Area;
use crate::domain::models::GateDecision;
use crate::domain::models::Route;
use crate::domain::models::Session;

/// Decides which half of the app may be shown. Holds no state of its own,
/// every decision is derived from the session and the current area.
pub struct HydrationGate {}

impl HydrationGate {
    pub fn decide(hydrated: bool, has_credential: bool, area: Area) -> GateDecision {
        if !hydrated {
            return GateDecision::Wait;
        }

        if !has_credential && area != Area::Unauthenticated {
            return GateDecision::Redirect(Route::Login);
        }

        if has_credential && area == Area::Unauthenticated {
            return GateDecision::Redirect(Route::Home);
        }

        return GateDecision::Stay;
    }

    pub fn evaluate(session: &Session, area: Area) -> GateDecision {
        return HydrationGate::decide(
            session.is_hydrated(),
            session.credential().is_some(),
            area,
        );
    }

    /// Where the app root sends the user, `None` until the session is loaded.
    pub fn entry_route(session: &Session) -> Option<Route> {
        if !session.is_hydrated() {
            return None;
        }

        if session.is_authenticated() {
            return Some(Route::Home);
        }

        return Some(Route::Login);
    }

    /// Re-evaluates on every session change and resolves with the first
    /// redirect issued for `area`.
    pub async fn watch(rx: &mut watch::Receiver<Session>, area: Area) -> Result<Route> {
        loop {
            let decision = HydrationGate::evaluate(&rx.borrow_and_update(), area);
            if let GateDecision::Redirect(route) = decision {
                return Ok(route);
            }

            rx.changed().await?;
        }
    }
}
