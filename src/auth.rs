//! Mock session
//!
//! There is no credential check: any well-formed email and non-blank password
//! logs in. The signed-in user is kept in a [`KeyValueStore`] under
//! [`USER_KEY`] so a new session can pick it up again.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::storage::{KeyValueStore, StorageError, load_json, save_json};

/// Storage key of the signed-in user.
pub const USER_KEY: &str = "user";

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email is blank or has no `@`.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// Password is blank.
    #[error("password is required")]
    MissingPassword,

    /// Wrapped storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a user may access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Storefront customer
    #[default]
    Customer,

    /// Back-office administrator
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => f.write_str("customer"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// Signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Session user id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Sign-in email
    pub email: String,
    /// Access level
    pub role: Role,
}

impl User {
    /// Whether the user can open the admin back-office.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Session bound to a store.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    user: Option<User>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a signed-out session.
    pub fn new(store: S) -> Self {
        Self { store, user: None }
    }

    /// Start a session with the user saved in `store`, if any.
    ///
    /// A malformed saved user is ignored.
    pub fn restore(store: S) -> Self {
        let user = load_json(&store, USER_KEY);

        Self { store, user }
    }

    /// The signed-in user.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in.
    ///
    /// The user is an admin when the email's local part is `admin`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidEmail`]: email is blank or has no `@`.
    /// - [`AuthError::MissingPassword`]: password is blank.
    /// - [`AuthError::Storage`]: the user could not be saved.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        let email = email.trim();

        let Some((local, _domain)) = email.split_once('@') else {
            return Err(AuthError::InvalidEmail(email.to_string()));
        };

        if local.is_empty() {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }

        if password.trim().is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let role = if local.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Customer
        };

        let user = User {
            id: Uuid::now_v7(),
            name: display_name(local),
            email: email.to_string(),
            role,
        };

        save_json(&mut self.store, USER_KEY, &user)?;

        info!(email = %user.email, %role, "signed in");

        Ok(self.user.insert(user))
    }

    /// Sign out and forget the saved user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the saved user cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.remove(USER_KEY)?;

        if let Some(user) = self.user.take() {
            info!(email = %user.email, "signed out");
        }

        Ok(())
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the backing store.
    pub fn into_store(self) -> S {
        self.store
    }
}

fn display_name(local: &str) -> String {
    let mut chars = local.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::*;

    #[test]
    fn login_as_customer() -> TestResult {
        let mut session = Session::new(MemoryStore::new());

        let user = session.login("ana@example.com", "secret")?;

        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name, "Ana");
        assert!(session.is_authenticated());

        Ok(())
    }

    #[test]
    fn admin_local_part_gets_admin_role() -> TestResult {
        let mut session = Session::new(MemoryStore::new());

        let user = session.login("admin@decora.com.br", "x")?;

        assert!(user.is_admin());

        Ok(())
    }

    #[test]
    fn login_rejects_malformed_input() {
        let mut session = Session::new(MemoryStore::new());

        assert!(matches!(
            session.login("ana.example.com", "secret"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            session.login("@example.com", "secret"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            session.login("ana@example.com", "   "),
            Err(AuthError::MissingPassword)
        ));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn restore_reads_saved_user() -> TestResult {
        let mut session = Session::new(MemoryStore::new());
        let id = session.login("ana@example.com", "secret")?.id;

        let restored = Session::restore(session.into_store());

        assert_eq!(restored.user().map(|user| user.id), Some(id));

        Ok(())
    }

    #[test]
    fn restore_ignores_malformed_user() -> TestResult {
        let mut store = MemoryStore::new();
        store.set(USER_KEY, "{\"id\": 1}".to_string())?;

        let session = Session::restore(store);

        assert!(session.user().is_none());

        Ok(())
    }

    #[test]
    fn logout_forgets_user() -> TestResult {
        let mut session = Session::new(MemoryStore::new());
        session.login("ana@example.com", "secret")?;

        session.logout()?;

        assert!(!session.is_authenticated());
        assert_eq!(session.store().get(USER_KEY)?, None);

        Ok(())
    }
}
