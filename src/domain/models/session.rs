#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;

/// Name of the durable record holding the signed in user.
pub const SESSION_RECORD: &str = "auth-store";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

impl User {
    pub fn new(id: &str, user_name: &str) -> User {
        return User {
            id: id.to_string(),
            user_name: user_name.to_string(),
        };
    }
}

/// A user and the bearer token issued for them. Holding both in one value
/// keeps a session from ever carrying one without the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user: User,
    pub token: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
    hydrated: bool,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        return self.credentials.as_ref().map(|e| return &e.user);
    }

    pub fn credential(&self) -> Option<&str> {
        return self.credentials.as_ref().map(|e| return e.token.as_str());
    }

    pub fn is_authenticated(&self) -> bool {
        return self.credentials.is_some();
    }

    pub fn is_hydrated(&self) -> bool {
        return self.hydrated;
    }

    pub(crate) fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials;
    }

    pub(crate) fn mark_hydrated(&mut self) {
        self.hydrated = true;
    }

    pub fn snapshot(&self) -> PersistedSession {
        return PersistedSession {
            user: self.user().cloned(),
            credential: self.credential().map(|e| return e.to_string()),
        };
    }
}

/// On disk layout of the session record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: Option<User>,
    pub credential: Option<String>,
}

impl PersistedSession {
    /// Converts a stored record back into credentials. Records holding only
    /// half of a session are treated as empty.
    pub fn into_credentials(self) -> Option<Credentials> {
        match (self.user, self.credential) {
            (Some(user), Some(token)) if !token.is_empty() => {
                return Some(Credentials { user, token });
            }
            (None, None) => return None,
            (user, credential) => {
                tracing::warn!(
                    has_user = user.is_some(),
                    has_credential = credential.is_some(),
                    "Discarding incomplete session record"
                );
                return None;
            }
        }
    }
}
