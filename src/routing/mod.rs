//! Navigation decisions derived from session state.
//!
//! The guard is a pure function of the current auth state, evaluated on
//! every navigation attempt; it never mutates anything.

use crate::session::AuthState;

/// A parsed navigation target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    PlaylistDetail(String),
    Unknown(String),
}

impl Route {
    /// Parses a path string. Anything unrecognized maps to `Unknown` and
    /// ends at the not-found view.
    pub fn parse(path: &str) -> Route {
        match path {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/dashboard" => Route::Dashboard,
            _ => {
                if let Some(id) = path.strip_prefix("/playlist/") {
                    if !id.is_empty() && !id.contains('/') {
                        return Route::PlaylistDetail(id.to_string());
                    }
                }
                Route::Unknown(path.to_string())
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::PlaylistDetail(id) => format!("/playlist/{}", id),
            Route::Unknown(path) => path.clone(),
        }
    }

    fn requires_auth(&self) -> bool {
        matches!(self, Route::Dashboard | Route::PlaylistDetail(_))
    }

    /// Login and registration are the public entry views.
    fn is_public_entry(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// Outcome of a navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested route renders as-is.
    Render(Route),
    /// The guard bounces the request somewhere else.
    Redirect(Route),
    /// Terminal not-found view; no state change.
    NotFound,
}

pub fn navigate(route: &Route, state: AuthState) -> NavigationOutcome {
    match route {
        Route::Unknown(_) => NavigationOutcome::NotFound,
        Route::Home => match state {
            AuthState::Authenticated => NavigationOutcome::Redirect(Route::Dashboard),
            AuthState::Anonymous => NavigationOutcome::Redirect(Route::Login),
        },
        r if r.requires_auth() && state == AuthState::Anonymous => {
            NavigationOutcome::Redirect(Route::Login)
        }
        r if r.is_public_entry() && state == AuthState::Authenticated => {
            NavigationOutcome::Redirect(Route::Dashboard)
        }
        r => NavigationOutcome::Render(r.clone()),
    }
}
