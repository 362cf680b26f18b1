//! Décision d'accès, partagée par le serveur edge et le garde côté rendu.

use crate::{
    role::{home_for, Role},
    routes::{classify, RouteClass, LOGIN_PATH, NEUTRAL_HOME},
};

/// What a call site knows about the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Session restore has not settled yet.
    Loading,
    Anonymous,
    /// `None` : the role could not be recognized (stale or foreign value).
    Authenticated(Option<Role>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render a neutral loading state, do not navigate.
    Defer,
    Allow,
    RedirectTo(&'static str),
}

/// Total, synchronous and side-effect free. First matching rule wins.
pub fn decide(viewer: Viewer, path: &str) -> Decision {
    let class = classify(path);

    match (viewer, class) {
        (Viewer::Loading, _) => Decision::Defer,
        (Viewer::Anonymous, RouteClass::Public) => Decision::Allow,
        (Viewer::Anonymous, _) => Decision::RedirectTo(LOGIN_PATH),
        (Viewer::Authenticated(role), RouteClass::Public) => Decision::RedirectTo(home_for(role)),
        (Viewer::Authenticated(role), RouteClass::PrivateFor(owner)) if role != Some(owner) => {
            Decision::RedirectTo(NEUTRAL_HOME)
        }
        _ => Decision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC: &[&str] = &[
        "/login",
        "/register",
        "/activate/MTI/abc",
        "/resend-activation",
        "/forgot-password",
        "/reset-password/MTI/tok",
        "/verify-email/tok",
    ];

    const PRIVATE: &[&str] = &[
        "/",
        "/profile",
        "/admin/dashboard",
        "/admin/users",
        "/supervisor/dashboard",
        "/supervisor/users",
        "/supervisor/courses/3",
        "/trainee/courses",
        "/trainee/reports",
        "/administrator",
    ];

    fn all_paths() -> impl Iterator<Item = &'static str> {
        PUBLIC.iter().chain(PRIVATE).copied()
    }

    fn all_viewers() -> Vec<Viewer> {
        let mut v = vec![Viewer::Anonymous, Viewer::Authenticated(None)];
        v.extend(Role::ALL.map(|r| Viewer::Authenticated(Some(r))));
        v
    }

    #[test]
    fn loading_always_defers() {
        for p in all_paths() {
            assert_eq!(decide(Viewer::Loading, p), Decision::Defer, "{p}");
        }
    }

    #[test]
    fn anonymous_on_public_is_allowed() {
        for p in PUBLIC {
            assert_eq!(decide(Viewer::Anonymous, p), Decision::Allow, "{p}");
        }
    }

    #[test]
    fn anonymous_elsewhere_goes_to_login() {
        for p in PRIVATE {
            assert_eq!(decide(Viewer::Anonymous, p), Decision::RedirectTo("/login"), "{p}");
        }
        assert_eq!(decide(Viewer::Anonymous, "/login"), Decision::Allow);
    }

    #[test]
    fn authenticated_on_public_goes_home() {
        for role in Role::ALL {
            for p in PUBLIC {
                assert_eq!(
                    decide(Viewer::Authenticated(Some(role)), p),
                    Decision::RedirectTo(role.home()),
                    "{role} {p}"
                );
            }
        }
        assert_eq!(decide(Viewer::Authenticated(None), "/login"), Decision::RedirectTo("/"));
    }

    #[test]
    fn own_prefix_is_allowed() {
        for role in Role::ALL {
            let viewer = Viewer::Authenticated(Some(role));
            assert_eq!(decide(viewer, role.home()), Decision::Allow);
            assert_eq!(decide(viewer, &format!("{}/anything/deeper", role.prefix())), Decision::Allow);
        }
    }

    #[test]
    fn foreign_prefix_bounces_to_neutral_home() {
        for role in Role::ALL {
            for other in Role::ALL.into_iter().filter(|o| *o != role) {
                let viewer = Viewer::Authenticated(Some(role));
                assert_eq!(decide(viewer, other.home()), Decision::RedirectTo("/"));
                assert_eq!(decide(viewer, "/"), Decision::Allow);
            }
        }
        for role in Role::ALL {
            assert_eq!(
                decide(Viewer::Authenticated(None), role.home()),
                Decision::RedirectTo("/")
            );
        }
    }

    #[test]
    fn redirects_terminate_in_one_hop() {
        for viewer in all_viewers() {
            for p in all_paths() {
                if let Decision::RedirectTo(target) = decide(viewer, p) {
                    assert_eq!(
                        decide(viewer, target),
                        Decision::Allow,
                        "{viewer:?}: {p} -> {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn scenarios() {
        assert_eq!(
            decide(Viewer::Authenticated(Some(Role::Trainee)), "/admin/dashboard"),
            Decision::RedirectTo("/")
        );
        assert_eq!(
            decide(Viewer::Authenticated(Some(Role::Admin)), "/login"),
            Decision::RedirectTo("/admin/dashboard")
        );
        assert_eq!(decide(Viewer::Anonymous, "/trainee/courses"), Decision::RedirectTo("/login"));
        assert_eq!(
            decide(Viewer::Authenticated(Some(Role::Supervisor)), "/supervisor/users"),
            Decision::Allow
        );
    }
}
