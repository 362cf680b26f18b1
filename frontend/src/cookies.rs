//! Cookies lus par le serveur edge : présence + rôle, posés et effacés ensemble.
//! Ils suivent le store (voir `SessionProvider`) et vivent aussi longtemps que
//! le `localStorage`, rafraîchis à chaque restore/login.

use cookie::{time::Duration, Cookie, SameSite};
use lms_gate::{
    edge::{CookieSync, PRESENCE_COOKIE, ROLE_COOKIE},
    Role,
};
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlDocument};

const GATE_COOKIE_DAYS: i64 = 30;

fn html_document() -> Option<HtmlDocument> {
    let document = window()?.document()?;
    document.dyn_into::<HtmlDocument>().ok()
}

fn gate_cookie(name: &'static str, value: String, max_age: Duration) -> String {
    Cookie::build(name, value)
        .path("/")
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .finish()
        .to_string()
}

fn write(cookies: [String; 2]) {
    let Some(doc) = html_document() else {
        warn!("no document: gate cookies not written");
        return;
    };
    for c in cookies {
        if let Err(e) = doc.set_cookie(&c) {
            warn!("cookie write failed: {e:?}");
        }
    }
}

pub fn set_gate_cookies(role: Role) {
    let max_age = Duration::days(GATE_COOKIE_DAYS);
    write([
        gate_cookie(PRESENCE_COOKIE, "1".into(), max_age),
        gate_cookie(ROLE_COOKIE, role.as_str().into(), max_age),
    ]);
}

pub fn clear_gate_cookies() {
    write([
        gate_cookie(PRESENCE_COOKIE, String::new(), Duration::ZERO),
        gate_cookie(ROLE_COOKIE, String::new(), Duration::ZERO),
    ]);
}

pub fn apply(sync: CookieSync) {
    match sync {
        CookieSync::Keep => {}
        CookieSync::Set(role) => set_gate_cookies(role),
        CookieSync::Clear => clear_gate_cookies(),
    }
}
