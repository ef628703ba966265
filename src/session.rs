/// Identity of the logged-in user for the lifetime of a screen.
///
/// Supplied by whoever performed the login; the deck never reads
/// credentials from anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: Option<String>,
    token: Option<String>,
}

impl Session {
    pub fn new(username: impl Into<String>, token: Option<String>) -> Self {
        let username = username.into();
        Self {
            username: (!username.trim().is_empty()).then_some(username),
            token,
        }
    }

    /// A session with no logged-in user; nobody is excluded from the deck.
    pub fn anonymous() -> Self {
        Self {
            username: None,
            token: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
