use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role stored on every registered user.
///
/// Spelled exactly `User` / `Admin` on the wire and in the `users.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Role::User => 0b01,
            Role::Admin => 0b10,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateConfigError {
    #[error("an access gate needs at least one accepted role")]
    EmptyRoleSet,
}

/// Non-empty set of roles an access gate lets through.
///
/// Emptiness is ruled out at construction, so a gate can never be built
/// that denies every caller by accident.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    pub fn only(role: Role) -> Self {
        Self(role.bit())
    }

    pub fn all() -> Self {
        Self(Role::ALL.iter().fold(0, |acc, r| acc | r.bit()))
    }

    pub fn try_from_roles(roles: impl IntoIterator<Item = Role>) -> Result<Self, GateConfigError> {
        let bits = roles.into_iter().fold(0, |acc, r| acc | r.bit());
        if bits == 0 {
            return Err(GateConfigError::EmptyRoleSet);
        }
        Ok(Self(bits))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

/// Plain users only.
impl Default for RoleSet {
    fn default() -> Self {
        Self::only(Role::User)
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_column_spelling() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn role_parsing_is_case_sensitive() {
        assert_eq!("admin".parse::<Role>(), Err(UnknownRole("admin".into())));
    }

    #[test]
    fn role_serializes_as_plain_name() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Admin\"");
    }

    #[test]
    fn empty_role_set_is_rejected() {
        assert_eq!(
            RoleSet::try_from_roles(std::iter::empty()),
            Err(GateConfigError::EmptyRoleSet)
        );
    }

    #[test]
    fn duplicate_roles_collapse() {
        let set = RoleSet::try_from_roles([Role::Admin, Role::Admin]).unwrap();
        assert_eq!(set, RoleSet::only(Role::Admin));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Role::Admin]);
    }

    #[test]
    fn default_accepts_users_only() {
        let set = RoleSet::default();
        assert!(set.contains(Role::User));
        assert!(!set.contains(Role::Admin));
    }

    #[test]
    fn all_contains_every_role() {
        let set = RoleSet::all();
        assert!(Role::ALL.iter().all(|r| set.contains(*r)));
        assert_eq!(format!("{:?}", set), "{User, Admin}");
    }
}
