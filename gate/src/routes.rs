//! Classification des chemins : purement fonction de la chaîne, jamais de la session.

use crate::role::Role;

pub const LOGIN_PATH: &str = "/login";

/// Neutral page outside every role prefix; target of cross-role denials.
pub const NEUTRAL_HOME: &str = "/";

/// Reachable without a session (auth, activation and recovery flows).
pub const PUBLIC_PREFIXES: &[&str] = &[
    LOGIN_PATH,
    "/register",
    "/activate",
    "/resend-activation",
    "/forgot-password",
    "/reset-password",
    "/verify-email",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    PrivateFor(Role),
    /// Any authenticated session, whatever its role.
    Authenticated,
}

/// Drops query/fragment and collapses empty segments: `//admin/users/?x=1` → `/admin/users`.
pub fn normalize(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let segments: Vec<&str> = path[..end].split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// `path` equals `prefix` or lies below it, on a segment boundary.
fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn classify(path: &str) -> RouteClass {
    let path = normalize(path);

    if PUBLIC_PREFIXES.iter().any(|p| is_under(&path, p)) {
        return RouteClass::Public;
    }
    Role::ALL
        .into_iter()
        .find(|r| is_under(&path, r.prefix()))
        .map_or(RouteClass::Authenticated, RouteClass::PrivateFor)
}
