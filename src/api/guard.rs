//! Route guard for dashboard pages
//!
//! A request counts as logged in when the session cookie is present. The
//! cookie's signature is not checked here.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::auth::cookie_value;
use super::state::AppState;

const AUTH_ROUTES: [&str; 2] = ["/sign-in", "/sign-up"];
const DASHBOARD_ROUTES: [&str; 4] = ["/dashboard", "/data", "/profile", "/tasks"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(&'static str),
}

/// Where a request for `path` should go
pub fn guard_decision(path: &str, logged_in: bool) -> GuardDecision {
    if path.starts_with("/api") {
        return GuardDecision::Pass;
    }
    let is_auth_route = AUTH_ROUTES.iter().any(|r| path.starts_with(r));
    let is_dashboard_route = DASHBOARD_ROUTES.iter().any(|r| path.starts_with(r));

    if is_auth_route && logged_in {
        GuardDecision::Redirect("/dashboard")
    } else if is_dashboard_route && !logged_in {
        GuardDecision::Redirect("/sign-in")
    } else {
        GuardDecision::Pass
    }
}

/// Axum middleware applying [`guard_decision`] to page routes
pub async fn route_guard(State(state): State<AppState>, request: Request<Body>, next: Next) -> Response {
    let logged_in = cookie_value(request.headers(), state.auth.cookie_name()).is_some();
    match guard_decision(request.uri().path(), logged_in) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(to) => {
            debug!(path = %request.uri().path(), to, "guard redirect");
            Redirect::temporary(to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_out_dashboard_routes_go_to_sign_in() {
        for path in ["/dashboard", "/data", "/profile", "/tasks", "/tasks/board"] {
            assert_eq!(guard_decision(path, false), GuardDecision::Redirect("/sign-in"));
            assert_eq!(guard_decision(path, true), GuardDecision::Pass);
        }
    }

    #[test]
    fn test_logged_in_auth_routes_go_to_dashboard() {
        for path in ["/sign-in", "/sign-up"] {
            assert_eq!(guard_decision(path, true), GuardDecision::Redirect("/dashboard"));
            assert_eq!(guard_decision(path, false), GuardDecision::Pass);
        }
    }

    #[test]
    fn test_other_routes_pass() {
        assert_eq!(guard_decision("/", false), GuardDecision::Pass);
        assert_eq!(guard_decision("/api/v1/tasks", false), GuardDecision::Pass);
        assert_eq!(guard_decision("/about", true), GuardDecision::Pass);
    }
}
