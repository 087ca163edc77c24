use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

/// Roles a principal may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// May read and write their own cash cards
    CardOwner,
    /// Authenticates fine but has no access to cash cards
    NonOwner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CardOwner => "CARD-OWNER",
            Role::NonOwner => "NON-OWNER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    BadCredentials,

    #[error("Malformed Authorization header: {0}")]
    MalformedHeader(&'static str),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Credential check did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The identity a request was authenticated as
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub name: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone)]
struct User {
    password_hash: String,
    roles: Vec<Role>,
}

/// Fixed set of users with bcrypt password hashes
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, User>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in accounts: two card owners and one user without access
    pub fn with_demo_users(cost: u32) -> Result<Self, AuthError> {
        let mut store = Self::new();
        store.add_user("sarah1", "abc123", vec![Role::CardOwner], cost)?;
        store.add_user("hank-owns-no-cards", "qrs456", vec![Role::NonOwner], cost)?;
        store.add_user("kumar2", "xyz789", vec![Role::CardOwner], cost)?;
        Ok(store)
    }

    pub fn add_user(&mut self, username: &str, password: &str, roles: Vec<Role>, cost: u32) -> Result<(), AuthError> {
        let password_hash = bcrypt::hash(password, cost)?;
        self.users.insert(username.to_string(), User { password_hash, roles });
        Ok(())
    }

    /// Check a username/password pair. bcrypt runs on the blocking pool.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let user = self.users.get(username).ok_or(AuthError::BadCredentials)?.clone();

        let password = password.to_string();
        let hash = user.password_hash;
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?;

        if !matches {
            return Err(AuthError::BadCredentials);
        }

        debug!("authenticated {}", username);
        Ok(Principal {
            name: username.to_string(),
            roles: user.roles,
        })
    }
}
