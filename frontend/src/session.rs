use std::{cell::RefCell, rc::Rc};

use lms_gate::{edge::cookie_sync, Session, SessionError, SessionState, SessionStore, Viewer};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::{cookies, storage::BrowserStorage};

type SharedStore = Rc<RefCell<SessionStore<BrowserStorage>>>;

/* ---------------- handle exposé par le contexte ---------------- */

/// Snapshot of the store state plus its write API.
#[derive(Clone)]
pub struct SessionHandle {
    store: SharedStore,
    state: SessionState,
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store) && self.state == other.state
    }
}

impl SessionHandle {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session.as_ref()
    }

    pub fn viewer(&self) -> Viewer {
        self.state.viewer()
    }

    pub fn login(&self, session: Session) -> Result<(), SessionError> {
        self.store.borrow_mut().login(session)
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.borrow_mut().logout()
    }
}

/* ---------------- hook pratique -------------------- */
#[hook]
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>().expect("SessionProvider manquant")
}

/* -------------- props du provider ----------------- */
#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    #[prop_or_default]
    pub children: Children,
}

/* -------------- provider global ------------------- */
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let store: SharedStore = use_memo((), |_| RefCell::new(SessionStore::new(BrowserStorage)));
    let state = use_state(SessionState::loading);

    {
        let store = store.clone();
        let state = state.clone();
        use_effect_with((), move |_| {
            // les cookies edge suivent le store : restore, login, logout
            let id = store.borrow_mut().subscribe(move |s| {
                cookies::apply(cookie_sync(s));
                state.set(s.clone());
            });

            // restore en tâche : ignoré si un login/logout est passé entre-temps
            let ticket = store.borrow().begin_restore();
            {
                let store = store.clone();
                spawn_local(async move {
                    let loaded = store.borrow().read_persisted();
                    store.borrow_mut().finish_restore(ticket, loaded);
                });
            }

            move || {
                store.borrow_mut().unsubscribe(id);
            }
        });
    }

    let handle = SessionHandle { store, state: (*state).clone() };

    html! {
        <ContextProvider<SessionHandle> context={handle}>
            { for props.children.iter() }
        </ContextProvider<SessionHandle>>
    }
}
