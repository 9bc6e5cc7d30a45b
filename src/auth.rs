//! Demo users and sign-in.

use serde::{Deserialize, Serialize};

use crate::policy::{Actor, Role};

/// A demo user record.
///
/// Credentials are stored and compared in the clear: sign-in here is a
/// storefront convenience for a single local session, not access control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user id.
    pub id: String,

    /// Sign-in name.
    pub username: String,

    /// Sign-in password, plaintext.
    pub password: String,

    /// Display name stamped onto grants.
    pub name: String,

    /// Authorisation role.
    pub role: Role,
}

impl User {
    /// The actor identity this user signs in as.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor {
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Look up a user by exact username/password match.
#[must_use]
pub fn verify_credentials<'a>(
    users: &'a [User],
    username: &str,
    password: &str,
) -> Option<&'a User> {
    users
        .iter()
        .find(|user| user.username == username && user.password == password)
}
