//! Pages hors périmètre du garde : simples coquilles.

use lms_gate::home_for;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{session::use_session, Route};

#[derive(Properties, PartialEq)]
pub struct PlaceholderProps {
    pub title: AttrValue,
}

#[function_component(Placeholder)]
pub fn placeholder(props: &PlaceholderProps) -> Html {
    html! { <h2>{ props.title.clone() }</h2> }
}

/// Neutral landing page, also the target of cross-role denials.
#[function_component(Home)]
pub fn home() -> Html {
    let session = use_session();
    let Some(s) = session.session() else {
        return Html::default();
    };
    let target = Route::recognize(home_for(Some(s.role()))).unwrap_or(Route::Home);

    html! {
        <div class="home">
            <h2>{ format!("Bonjour {}", s.identity.full_name) }</h2>
            <Link<Route> to={target}>{"Aller à mon espace"}</Link<Route>>
        </div>
    }
}
