//! Who a financial document belongs to. Registered users map to a row id in the users
//! table; guests carry their document with them and are never persisted.

use uuid::Uuid;

use super::FinancialDocument;

pub type UserId = i64;

/// A session-scoped stand-in for a user. The caller keeps `data` between requests.
#[derive(Clone, Debug, PartialEq)]
pub struct GuestSession {
    pub id: Uuid,
    pub data: Option<FinancialDocument>,
}

impl GuestSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            data: None,
        }
    }

    pub fn with_data(data: FinancialDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: Some(data),
        }
    }
}

impl Default for GuestSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Identity {
    User(UserId),
    Guest(GuestSession),
}

impl Identity {
    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest(_))
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::User(id) => write!(f, "user:{}", id),
            Identity::Guest(session) => write!(f, "guest:{}", session.id),
        }
    }
}

/// Parse a user id from a CLI or form value.
pub fn parse_user_id(id: &str) -> Result<UserId, String> {
    id.trim()
        .parse::<UserId>()
        .map_err(|e| format!("Invalid user id {:?}: {}", id, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_ids() {
        assert_eq!(parse_user_id(" 42 "), Ok(42));
        assert!(parse_user_id("abc").is_err());
    }

    #[test]
    fn identity_display() {
        assert_eq!(Identity::User(7).to_string(), "user:7");
        let guest = GuestSession::new();
        let id = guest.id;
        assert_eq!(Identity::Guest(guest).to_string(), format!("guest:{}", id));
        assert!(GuestSession::new().data.is_none());
    }
}
