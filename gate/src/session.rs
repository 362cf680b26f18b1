//! Session store : source unique de « qui est connecté ».
//!
//! * état en mémoire (`SessionState`) + miroir durable dans un [`Storage`]
//! * écritures via `login` / `logout` / `restore` uniquement
//! * chaque écriture notifie les abonnés (re-évaluation du garde)

use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    access::Viewer,
    error::{SessionError, StorageError},
    role::Role,
    storage::Storage,
};

/// Storage keys of the persisted session.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER: &str = "user";

    pub const ALL: [&str; 3] = [USER, ACCESS_TOKEN, REFRESH_TOKEN];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id:         i64,
    pub email:      String,
    #[serde(alias = "full_name")]
    pub full_name:  String,
    pub role:       Role,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

/// Identity and credentials, always set and cleared together.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub identity:      Identity,
    pub access_token:  String,
    pub refresh_token: String,
}

impl Session {
    pub fn role(&self) -> Role {
        self.identity.role
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub is_loading: bool,
    pub session:    Option<Session>,
}

impl SessionState {
    /// Process start: nothing known yet.
    pub fn loading() -> Self {
        Self { is_loading: true, session: None }
    }

    pub fn viewer(&self) -> Viewer {
        match (&self.session, self.is_loading) {
            (_, true) => Viewer::Loading,
            (None, false) => Viewer::Anonymous,
            (Some(s), false) => Viewer::Authenticated(Some(s.role())),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Taken before reading storage; a restore finishing after a newer write is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RestoreTicket {
    generation: u64,
}

type Subscriber = Box<dyn Fn(&SessionState)>;

pub struct SessionStore<S> {
    storage:     S,
    state:       SessionState,
    generation:  u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id:     u64,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: SessionState::loading(),
            generation: 0,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn viewer(&self) -> Viewer {
        self.state.viewer()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /* ---------------- abonnements ---------------- */

    pub fn subscribe(&mut self, callback: impl Fn(&SessionState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&self) {
        for (_, callback) in &self.subscribers {
            callback(&self.state);
        }
    }

    /* ---------------- restore ---------------- */

    /// Never fails: unreadable or malformed data leaves the session empty.
    pub fn restore(&mut self) {
        let ticket = self.begin_restore();
        let loaded = self.read_persisted();
        self.finish_restore(ticket, loaded);
    }

    pub fn begin_restore(&self) -> RestoreTicket {
        RestoreTicket { generation: self.generation }
    }

    /// Reads the three persisted fields; all absent is `Ok(None)`, anything partial is corrupt.
    pub fn read_persisted(&self) -> Result<Option<Session>, SessionError> {
        let read = |key: &str| {
            self.storage
                .get(key)
                .map_err(|e| SessionError::SessionRestoreCorrupt(format!("{key}: {e}")))
        };
        let user = read(keys::USER)?;
        let access = read(keys::ACCESS_TOKEN)?;
        let refresh = read(keys::REFRESH_TOKEN)?;

        match (user, access, refresh) {
            (None, None, None) => Ok(None),
            (Some(user), Some(access_token), Some(refresh_token)) => {
                if access_token.is_empty() || refresh_token.is_empty() {
                    return Err(SessionError::SessionRestoreCorrupt("empty token".into()));
                }
                let identity: Identity = serde_json::from_str(&user)
                    .map_err(|e| SessionError::SessionRestoreCorrupt(format!("user: {e}")))?;
                Ok(Some(Session { identity, access_token, refresh_token }))
            }
            _ => Err(SessionError::SessionRestoreCorrupt("partial session".into())),
        }
    }

    /// Applies a restore result unless a newer login/logout happened since `ticket`.
    /// Returns whether the result was applied.
    pub fn finish_restore(
        &mut self,
        ticket: RestoreTicket,
        loaded: Result<Option<Session>, SessionError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!("stale session restore discarded");
            return false;
        }

        let session = match loaded {
            Ok(session) => session,
            Err(e) => {
                warn!("{e}; starting without a session");
                for key in keys::ALL {
                    if let Err(err) = self.storage.remove(key) {
                        warn!("clearing `{key}` after corrupt restore failed: {err}");
                    }
                }
                None
            }
        };

        if let Some(s) = &session {
            debug!("session restored for user {} ({})", s.identity.id, s.role());
        }
        self.state = SessionState { is_loading: false, session };
        self.notify();
        true
    }

    /* ---------------- login / logout ---------------- */

    pub fn login(&mut self, session: Session) -> Result<(), SessionError> {
        let user = serde_json::to_string(&session.identity)
            .map_err(|e| SessionError::StoragePersistFailed(StorageError::Backend(e.to_string())))?;

        self.write_all(&[
            (keys::USER, Some(user.as_str())),
            (keys::ACCESS_TOKEN, Some(session.access_token.as_str())),
            (keys::REFRESH_TOKEN, Some(session.refresh_token.as_str())),
        ])?;

        info!("login: user {} as {}", session.identity.id, session.role());
        self.generation += 1;
        self.state = SessionState { is_loading: false, session: Some(session) };
        self.notify();
        Ok(())
    }

    /// Clears memory and storage; navigation is up to the caller.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.write_all(&keys::ALL.map(|k| (k, None)))?;

        if let Some(s) = &self.state.session {
            info!("logout: user {}", s.identity.id);
        }
        self.generation += 1;
        self.state = SessionState { is_loading: false, session: None };
        self.notify();
        Ok(())
    }

    /// Applies every change or none: on failure the keys already written get
    /// their previous values back (best effort) and the error is returned.
    fn write_all(&mut self, changes: &[(&str, Option<&str>)]) -> Result<(), SessionError> {
        let mut previous = Vec::with_capacity(changes.len());
        for (key, _) in changes {
            let old = self.storage.get(key).map_err(SessionError::StoragePersistFailed)?;
            previous.push(old);
        }

        for (done, (key, value)) in changes.iter().enumerate() {
            let res = match value {
                Some(v) => self.storage.set(key, v),
                None => self.storage.remove(key),
            };
            if let Err(e) = res {
                error!("session persist failed on `{key}`: {e}");
                self.rollback(&changes[..done], &previous[..done]);
                return Err(SessionError::StoragePersistFailed(e));
            }
        }
        Ok(())
    }

    fn rollback(&mut self, changes: &[(&str, Option<&str>)], previous: &[Option<String>]) {
        for ((key, _), old) in changes.iter().zip(previous) {
            let res = match old {
                Some(v) => self.storage.set(key, v),
                None => self.storage.remove(key),
            };
            if let Err(e) = res {
                error!("rollback of `{key}` failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    fn identity(role: Role) -> Identity {
        Identity {
            id: 7,
            email: "ana@lms.test".into(),
            full_name: "Ana Pereira".into(),
            role,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    fn session(role: Role) -> Session {
        Session {
            identity: identity(role),
            access_token: "acc-1".into(),
            refresh_token: "ref-1".into(),
        }
    }

    /// Memory storage whose writes to one chosen key fail.
    #[derive(Default)]
    struct FlakyStorage {
        inner:   MemoryStorage,
        fail_on: Rc<Cell<Option<&'static str>>>,
    }

    impl FlakyStorage {
        fn check(&self, key: &str) -> Result<(), StorageError> {
            match self.fail_on.get() {
                Some(k) if k == key => Err(StorageError::Backend("quota exceeded".into())),
                _ => Ok(()),
            }
        }
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.set(key, value)
        }
        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.remove(key)
        }
    }

    #[test]
    fn starts_loading() {
        let store = SessionStore::new(MemoryStorage::new());
        assert!(store.is_loading());
        assert_eq!(store.viewer(), Viewer::Loading);
    }

    #[test]
    fn restore_empty_storage() {
        let mut store = SessionStore::new(MemoryStorage::new());
        store.restore();
        assert!(!store.is_loading());
        assert_eq!(store.session(), None);
        assert_eq!(store.viewer(), Viewer::Anonymous);
    }

    #[test]
    fn login_then_restore_in_new_process() {
        let mut store = SessionStore::new(MemoryStorage::new());
        store.login(session(Role::Supervisor)).unwrap();
        assert_eq!(store.storage().len(), 3);

        let mut reloaded = SessionStore::new(store.storage().clone());
        reloaded.restore();
        assert_eq!(reloaded.session(), Some(&session(Role::Supervisor)));
        assert_eq!(reloaded.viewer(), Viewer::Authenticated(Some(Role::Supervisor)));
    }

    #[test]
    fn corrupt_json_restores_to_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(keys::USER, "{not json").unwrap();
        storage.set(keys::ACCESS_TOKEN, "a").unwrap();
        storage.set(keys::REFRESH_TOKEN, "r").unwrap();

        let mut store = SessionStore::new(storage);
        store.restore();
        assert!(!store.is_loading());
        assert_eq!(store.session(), None);
        assert!(store.storage().is_empty());
    }

    #[test]
    fn corrupt_restore_survives_failed_cleanup() {
        let mut inner = MemoryStorage::new();
        inner.set(keys::USER, "{not json").unwrap();
        inner.set(keys::ACCESS_TOKEN, "a").unwrap();
        inner.set(keys::REFRESH_TOKEN, "r").unwrap();
        let storage = FlakyStorage { inner, fail_on: Rc::default() };
        storage.fail_on.set(Some(keys::ACCESS_TOKEN));

        let mut store = SessionStore::new(storage);
        store.restore();
        assert!(!store.is_loading());
        assert_eq!(store.viewer(), Viewer::Anonymous);
        // les autres clés sont quand même effacées
        assert_eq!(store.storage().inner.get(keys::USER).unwrap(), None);
        assert_eq!(store.storage().inner.get(keys::REFRESH_TOKEN).unwrap(), None);
        assert_eq!(store.storage().inner.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn unknown_role_in_storage_is_corrupt() {
        let mut storage = MemoryStorage::new();
        let mut user = serde_json::to_value(identity(Role::Admin)).unwrap();
        user["role"] = "JANITOR".into();
        storage.set(keys::USER, &user.to_string()).unwrap();
        storage.set(keys::ACCESS_TOKEN, "a").unwrap();
        storage.set(keys::REFRESH_TOKEN, "r").unwrap();

        let mut store = SessionStore::new(storage);
        store.restore();
        assert_eq!(store.viewer(), Viewer::Anonymous);
    }

    #[test]
    fn partial_session_is_corrupt() {
        let mut storage = MemoryStorage::new();
        storage.set(keys::ACCESS_TOKEN, "a").unwrap();

        let store = SessionStore::new(storage);
        assert!(matches!(
            store.read_persisted(),
            Err(SessionError::SessionRestoreCorrupt(_))
        ));
    }

    #[test]
    fn accepts_snake_case_identity() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                keys::USER,
                r#"{"id":3,"email":"t@lms.test","full_name":"Tom","role":"TRAINEE","created_at":"2024-01-02T03:04:05Z"}"#,
            )
            .unwrap();
        storage.set(keys::ACCESS_TOKEN, "a").unwrap();
        storage.set(keys::REFRESH_TOKEN, "r").unwrap();

        let mut store = SessionStore::new(storage);
        store.restore();
        assert_eq!(store.session().map(|s| s.role()), Some(Role::Trainee));
    }

    #[test]
    fn late_restore_does_not_clobber_login() {
        let mut store = SessionStore::new(MemoryStorage::new());
        let ticket = store.begin_restore();
        let loaded = store.read_persisted();
        assert!(matches!(loaded, Ok(None)));

        store.login(session(Role::Admin)).unwrap();
        assert!(!store.finish_restore(ticket, loaded));
        assert_eq!(store.session(), Some(&session(Role::Admin)));
    }

    #[test]
    fn late_corrupt_restore_keeps_fresh_storage() {
        let mut storage = MemoryStorage::new();
        storage.set(keys::USER, "garbage").unwrap();
        let mut store = SessionStore::new(storage);

        let ticket = store.begin_restore();
        let loaded = store.read_persisted();
        store.login(session(Role::Trainee)).unwrap();
        assert!(!store.finish_restore(ticket, loaded));
        assert_eq!(store.storage().len(), 3);
    }

    #[test]
    fn logout_clears_everything() {
        let mut store = SessionStore::new(MemoryStorage::new());
        store.login(session(Role::Trainee)).unwrap();
        store.logout().unwrap();
        assert_eq!(store.session(), None);
        assert_eq!(store.viewer(), Viewer::Anonymous);
        assert!(store.storage().is_empty());
    }

    #[test]
    fn failed_login_leaves_memory_and_storage_unchanged() {
        let storage = FlakyStorage::default();
        storage.fail_on.set(Some(keys::REFRESH_TOKEN));
        let mut store = SessionStore::new(storage);
        store.restore();

        let err = store.login(session(Role::Admin)).unwrap_err();
        assert!(matches!(err, SessionError::StoragePersistFailed(_)));
        assert_eq!(store.viewer(), Viewer::Anonymous);
        // user and access token were written, then rolled back
        assert!(store.storage().inner.is_empty());
    }

    #[test]
    fn failed_logout_keeps_the_session() {
        let storage = FlakyStorage::default();
        let fail_on = storage.fail_on.clone();
        let mut store = SessionStore::new(storage);
        store.login(session(Role::Supervisor)).unwrap();

        fail_on.set(Some(keys::REFRESH_TOKEN));
        assert!(store.logout().is_err());
        assert_eq!(store.session(), Some(&session(Role::Supervisor)));

        let mut reloaded = SessionStore::new(store.storage().inner.clone());
        reloaded.restore();
        assert_eq!(reloaded.session(), Some(&session(Role::Supervisor)));
    }

    #[test]
    fn subscribers_see_every_write() {
        let seen: Rc<RefCell<Vec<Viewer>>> = Rc::default();
        let mut store = SessionStore::new(MemoryStorage::new());
        let id = {
            let seen = seen.clone();
            store.subscribe(move |state| seen.borrow_mut().push(state.viewer()))
        };

        store.restore();
        store.login(session(Role::Admin)).unwrap();
        store.logout().unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                Viewer::Anonymous,
                Viewer::Authenticated(Some(Role::Admin)),
                Viewer::Anonymous,
            ]
        );

        assert!(store.unsubscribe(id));
        store.restore();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn debug_hides_tokens() {
        let out = format!("{:?}", session(Role::Admin));
        assert!(!out.contains("acc-1"));
        assert!(!out.contains("ref-1"));
    }
}
