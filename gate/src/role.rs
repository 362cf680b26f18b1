use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::UnknownRole, routes::NEUTRAL_HOME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Trainee,
    Supervisor,
    Admin,
}

struct RoleEntry {
    name:   &'static str,
    prefix: &'static str,
    home:   &'static str,
}

// Indexed by the enum discriminant: keep both in the same order.
const ROLE_TABLE: [RoleEntry; 3] = [
    RoleEntry { name: "TRAINEE",    prefix: "/trainee",    home: "/trainee/courses" },
    RoleEntry { name: "SUPERVISOR", prefix: "/supervisor", home: "/supervisor/dashboard" },
    RoleEntry { name: "ADMIN",      prefix: "/admin",      home: "/admin/dashboard" },
];

impl Role {
    pub const ALL: [Role; 3] = [Role::Trainee, Role::Supervisor, Role::Admin];

    fn entry(self) -> &'static RoleEntry {
        &ROLE_TABLE[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.entry().name
    }

    /// Path prefix owned by this role.
    pub fn prefix(self) -> &'static str {
        self.entry().prefix
    }

    /// Landing page after login.
    pub fn home(self) -> &'static str {
        self.entry().home
    }
}

/// Landing page for a possibly unrecognized role; never dead-ends.
pub fn home_for(role: Option<Role>) -> &'static str {
    role.map_or(NEUTRAL_HOME, Role::home)
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
