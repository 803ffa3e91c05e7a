/// The two halves of the app. Only the unauthenticated area is reachable
/// without a credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Area {
    Unauthenticated,
    Authenticated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Verify,
    Home,
    Transactions,
    Schedule,
    Add,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => return "/login",
            Route::Signup => return "/signup",
            Route::Verify => return "/verify",
            Route::Home => return "/home",
            Route::Transactions => return "/transactions",
            Route::Schedule => return "/schedule",
            Route::Add => return "/add",
        }
    }

    pub fn area(&self) -> Area {
        match self {
            Route::Login | Route::Signup | Route::Verify => return Area::Unauthenticated,
            _ => return Area::Authenticated,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// The session has not been loaded yet. Render nothing.
    Wait,
    Stay,
    Redirect(Route),
}
