use log::{error, info};
use web_sys::HtmlInputElement;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{api, session::use_session};

fn input_value(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|i| i.value())
        .unwrap_or_default()
}

/* -------------------------------------------------------------------------- */
/*                               composant login                               */
/* -------------------------------------------------------------------------- */

/// On success the store is updated and the guard takes the user home.
#[function_component(LoginForm)]
pub fn login_form() -> Html {
    let session       = use_session();
    let email_ref     = use_node_ref();
    let password_ref  = use_node_ref();
    let remember_ref  = use_node_ref();
    let message_state = use_state(String::new);
    let busy          = use_state(|| false);

    /* ------------------ callback du <form onsubmit=…> --------------------- */
    let onsubmit = {
        let email_ref     = email_ref.clone();
        let password_ref  = password_ref.clone();
        let remember_ref  = remember_ref.clone();
        let message_state = message_state.clone();
        let busy          = busy.clone();

        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            if *busy {
                return;
            }

            let email    = input_value(&email_ref);
            let password = input_value(&password_ref);
            let remember = remember_ref
                .cast::<HtmlInputElement>()
                .is_some_and(|i| i.checked());

            busy.set(true);
            let session       = session.clone();
            let message_state = message_state.clone();
            let busy          = busy.clone();

            spawn_local(async move {
                match api::login(&email, &password, remember).await {
                    Ok(bundle) => {
                        if let Err(e) = session.login(bundle) {
                            error!("{e}");
                            message_state.set("Impossible d'ouvrir la session, réessayez.".into());
                        }
                    }
                    Err(e) => message_state.set(e.to_string()),
                }
                busy.set(false);
            });
        })
    };

    /* ---------------------------- rendu ---------------------------------- */
    html! {
        <div class="login-container">
            <h2>{"Connexion"}</h2>

            <form {onsubmit}>
                <input ref={email_ref} type="email" placeholder="Adresse e-mail" />
                <input ref={password_ref} type="password" placeholder="Mot de passe" />
                <label>
                    <input ref={remember_ref} type="checkbox" />
                    {" Se souvenir de moi"}
                </label>
                <button type="submit" disabled={*busy}>{"Se connecter"}</button>
            </form>

            {
                if !message_state.is_empty() {
                    html!(<p style="color:red;">{ &*message_state }</p>)
                } else {
                    Html::default()
                }
            }
        </div>
    }
}

/* -------------------------------------------------------------------------- */
/*                           activation du compte                              */
/* -------------------------------------------------------------------------- */

#[derive(Properties, PartialEq)]
pub struct ActivateProps {
    pub uidb64: String,
    pub token:  String,
}

#[derive(Clone, PartialEq)]
enum ActivationStatus {
    Pending,
    Done,
    Failed(String),
}

#[function_component(Activate)]
pub fn activate(props: &ActivateProps) -> Html {
    let status = use_state(|| ActivationStatus::Pending);

    {
        let status = status.clone();
        use_effect_with((props.uidb64.clone(), props.token.clone()), move |(uidb64, token)| {
            let (uidb64, token) = (uidb64.clone(), token.clone());
            spawn_local(async move {
                match api::activate(&uidb64, &token).await {
                    Ok(()) => {
                        info!("account activated");
                        status.set(ActivationStatus::Done);
                    }
                    Err(e) => status.set(ActivationStatus::Failed(e.to_string())),
                }
            });
            || ()
        });
    }

    match &*status {
        ActivationStatus::Pending => html!(<p>{"Activation en cours…"}</p>),
        ActivationStatus::Done => html! {
            <p>{"Compte activé. "}<a href="/login">{"Se connecter"}</a></p>
        },
        ActivationStatus::Failed(msg) => html! {
            <p style="color:red;">
                { format!("Échec de l'activation : {msg}. ") }
                <a href="/resend-activation">{"Renvoyer le lien"}</a>
            </p>
        },
    }
}

/* -------------------------------------------------------------------------- */
/*                        renvoi du lien d'activation                          */
/* -------------------------------------------------------------------------- */

#[function_component(ResendActivation)]
pub fn resend_activation() -> Html {
    let email_ref = use_node_ref();
    let message   = use_state(String::new);

    let onsubmit = {
        let email_ref = email_ref.clone();
        let message   = message.clone();
        Callback::from(move |ev: SubmitEvent| {
            ev.prevent_default();
            let email   = input_value(&email_ref);
            let message = message.clone();
            spawn_local(async move {
                match api::resend_activation(&email).await {
                    Ok(()) => message.set("Un nouveau lien a été envoyé.".into()),
                    Err(e) => message.set(e.to_string()),
                }
            });
        })
    };

    html! {
        <div class="login-container">
            <h2>{"Renvoyer le lien d'activation"}</h2>
            <form {onsubmit}>
                <input ref={email_ref} type="email" placeholder="Adresse e-mail" />
                <button type="submit">{"Envoyer"}</button>
            </form>
            <p>{ (*message).clone() }</p>
        </div>
    }
}
