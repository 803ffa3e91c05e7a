#[cfg(test)]
#[path = "router_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use yansi::Paint;

use super::quick_add;
use super::screens;
use super::App;
use crate::domain::models::GateDecision;
use crate::domain::models::Route;
use crate::domain::models::Session;
use crate::domain::models::TransactionFilter;
use crate::domain::models::TransactionQuery;
use crate::domain::services::HydrationGate;

/// A route plus whatever the user passed on the command line for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Login {
        email: Option<String>,
        password: Option<String>,
    },
    Signup {
        full_name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    },
    Verify {
        code: Option<String>,
    },
    Home,
    Transactions {
        query: TransactionQuery,
    },
    Schedule {
        date: Option<String>,
        filter: TransactionFilter,
    },
    Add {
        text: Option<String>,
    },
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Login { .. } => return Route::Login,
            Screen::Signup { .. } => return Route::Signup,
            Screen::Verify { .. } => return Route::Verify,
            Screen::Home => return Route::Home,
            Screen::Transactions { .. } => return Route::Transactions,
            Screen::Schedule { .. } => return Route::Schedule,
            Screen::Add { .. } => return Route::Add,
        }
    }
}

impl From<Route> for Screen {
    fn from(route: Route) -> Screen {
        match route {
            Route::Login => {
                return Screen::Login {
                    email: None,
                    password: None,
                };
            }
            Route::Signup => {
                return Screen::Signup {
                    full_name: None,
                    email: None,
                    password: None,
                };
            }
            Route::Verify => return Screen::Verify { code: None },
            Route::Home => return Screen::Home,
            Route::Transactions => {
                return Screen::Transactions {
                    query: TransactionQuery::default(),
                };
            }
            Route::Schedule => {
                return Screen::Schedule {
                    date: None,
                    filter: TransactionFilter::All,
                };
            }
            Route::Add => return Screen::Add { text: None },
        }
    }
}

/// The screen that is actually shown once the gate had its say. Redirected
/// screens lose their arguments.
pub fn resolve(session: &Session, screen: Screen) -> Result<Screen> {
    match HydrationGate::evaluate(session, screen.route().area()) {
        GateDecision::Wait => bail!("The stored session has not been loaded yet"),
        GateDecision::Stay => return Ok(screen),
        GateDecision::Redirect(route) => {
            tracing::debug!(from = screen.route().path(), to = route.path(), "Gate redirect");
            return Ok(Screen::from(route));
        }
    }
}

/// Shows `screen`, then whichever screen it hands over to, until one of them
/// finishes the run.
pub async fn open(app: &App, screen: Screen) -> Result<()> {
    let mut requested = screen;
    loop {
        let screen = resolve(&app.session.current(), requested.clone())?;
        if screen.route() != requested.route() {
            println!(
                "{}",
                Paint::yellow(format!("Redirecting to {}", screen.route().path()))
            );
        }

        let next = match screen {
            Screen::Login { email, password } => screens::login(app, email, password).await?,
            Screen::Signup {
                full_name,
                email,
                password,
            } => screens::signup(app, full_name, email, password).await?,
            Screen::Verify { code } => screens::verify(app, code).await?,
            Screen::Home => screens::home(app).await?,
            Screen::Transactions { query } => screens::transactions(app, &query).await?,
            Screen::Schedule { date, filter } => screens::schedule(app, date, filter).await?,
            Screen::Add { text: Some(text) } => screens::add_text(app, &text).await?,
            Screen::Add { text: None } => quick_add::run(app).await?,
        };

        match next {
            Some(screen) => requested = screen,
            None => return Ok(()),
        }
    }
}
