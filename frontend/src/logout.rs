use log::{error, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use lms_gate::Session;

use crate::{api, session::use_session, Route};

/// Tokens to revoke, copied out before the local session is dropped.
fn revocation_tokens(session: Option<&Session>) -> Option<(String, String)> {
    session.map(|s| (s.access_token.clone(), s.refresh_token.clone()))
}

/// Local logout first; API revocation afterwards, best effort.
#[function_component(Logout)]
pub fn logout() -> Html {
    let navigator = use_navigator();
    let session   = use_session();
    let message   = use_state(String::new);
    let busy      = use_state(|| false);

    let onclick = {
        let message = message.clone();
        let busy    = busy.clone();
        Callback::from(move |_| {
            if *busy {
                return;
            }
            let Some(tokens) = revocation_tokens(session.session()) else {
                return;
            };

            busy.set(true);
            // store vidé => le subscriber efface aussi les cookies edge
            if let Err(e) = session.logout() {
                error!("{e}");
                message.set("Déconnexion impossible, réessayez.".into());
                busy.set(false);
                return;
            }
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Login);
            }

            let busy = busy.clone();
            spawn_local(async move {
                let (access, refresh) = tokens;
                if let Err(e) = api::logout(&access, &refresh).await {
                    warn!("API logout failed: {e}");
                }
                busy.set(false);
            });
        })
    };

    html! {
        <>
            <button {onclick} disabled={*busy}>{ "Déconnexion" }</button>
            if !message.is_empty() {
                <span style="color:red;">{ &*message }</span>
            }
        </>
    }
}
