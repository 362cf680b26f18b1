//! Role-based session store and route gate for the LMS front end.
//!
//! * [`session::SessionStore`] : qui est connecté, persisté dans un [`storage::Storage`]
//! * [`access::decide`] : la décision unique (Defer / Allow / RedirectTo)
//! * [`edge`] : adaptateur cookies pour le serveur devant la SPA

pub mod access;
pub mod edge;
pub mod error;
pub mod role;
pub mod routes;
pub mod session;
pub mod storage;

pub use access::{decide, Decision, Viewer};
pub use error::{SessionError, StorageError, UnknownRole};
pub use role::{home_for, Role};
pub use routes::{classify, RouteClass, LOGIN_PATH, NEUTRAL_HOME};
pub use session::{Identity, Session, SessionState, SessionStore, SubscriptionId};
pub use storage::{MemoryStorage, Storage};
