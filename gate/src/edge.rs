//! Adaptateur « edge » : la même décision, nourrie par deux cookies seulement.
//!
//! Le serveur ne voit jamais l'état `Loading` : pas de cookie de présence
//! signifie anonyme. Le garde côté rendu reste l'autorité.

use crate::{
    access::{decide, Decision, Viewer},
    role::Role,
    routes::{classify, RouteClass},
    session::SessionState,
};

/// Presence flag; mirrors whether the session store holds a session.
pub const PRESENCE_COOKIE: &str = "access_token";
pub const ROLE_COOKIE: &str = "role";

/// Files emitted by `trunk build` and usual static assets.
pub const ASSET_EXTENSIONS: &[&str] = &[
    "js", "wasm", "css", "map", "ico", "png", "svg", "jpg", "jpeg", "gif", "webp", "woff",
    "woff2", "ttf",
];

pub fn viewer_from_cookies(presence: Option<&str>, role: Option<&str>) -> Viewer {
    match presence.map(str::trim) {
        None | Some("") => Viewer::Anonymous,
        Some(_) => Viewer::Authenticated(role.and_then(|r| r.parse::<Role>().ok())),
    }
}

/// Never returns [`Decision::Defer`].
pub fn decide_at_edge(presence: Option<&str>, role: Option<&str>, path: &str) -> Decision {
    decide(viewer_from_cookies(presence, role), path)
}

/// Static files (`/app-3f2a.wasm`, `/favicon.ico`) bypass the gate; anything
/// under a public or role prefix is always gated.
pub fn is_asset(path: &str) -> bool {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if classify(path) != RouteClass::Authenticated {
        return false;
    }
    path.rsplit('/')
        .next()
        .and_then(|last| last.rsplit_once('.'))
        .is_some_and(|(stem, ext)| {
            !stem.is_empty() && ASSET_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext))
        })
}

/// What the browser must do with the two edge cookies for a given store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSync {
    /// Restore not settled: leave the cookies as they are.
    Keep,
    Set(Role),
    Clear,
}

/// Cookies follow the store, so the edge sees what the render level sees.
pub fn cookie_sync(state: &SessionState) -> CookieSync {
    match (state.is_loading, &state.session) {
        (true, _) => CookieSync::Keep,
        (false, Some(s)) => CookieSync::Set(s.role()),
        (false, None) => CookieSync::Clear,
    }
}
