use lms_gate::{decide, Decision};
use log::debug;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{session::use_session, Route};

#[derive(Properties, PartialEq)]
pub struct AuthGuardProps {
    #[prop_or_default]
    pub children: Children,
}

/// Render-level gate: authoritative over the edge decision.
#[function_component(AuthGuard)]
pub fn auth_guard(props: &AuthGuardProps) -> Html {
    let session   = use_session();
    let navigator = use_navigator();
    let path = use_location()
        .map(|l| l.path().to_string())
        .unwrap_or_else(|| "/".into());

    let decision = decide(session.viewer(), &path);

    // une seule navigation par évaluation
    use_effect_with((decision, path), move |(decision, path)| {
        if let (Decision::RedirectTo(target), Some(navigator)) = (decision, navigator) {
            debug!("guard redirect {path} -> {target}");
            navigator.push(&Route::recognize(target).unwrap_or(Route::Home));
        }
        || ()
    });

    match decision {
        Decision::Defer => html!(<p class="loading">{"Chargement…"}</p>),
        Decision::Allow => html! { for props.children.iter() },
        Decision::RedirectTo(_) => Html::default(),
    }
}
