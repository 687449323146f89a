use std::fmt;

/// In-memory holder for the API token.
///
/// The token input widget writes into this holder; requests read from it
/// when they are constructed, never from the widget.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    pub fn new(token: Option<String>) -> Self {
        let mut creds = Self::default();
        if let Some(t) = token {
            creds.set(t);
        }
        creds
    }

    /// Replace the token. An empty string clears it.
    pub fn set(&mut self, token: String) {
        if token.is_empty() {
            self.clear();
        } else {
            self.token = Some(token);
        }
    }

    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn is_set(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the auth header. An unset token is sent as an empty value
    /// so the server answers 401 rather than the client refusing to ask.
    pub fn header_value(&self) -> String {
        self.token.clone().unwrap_or_default()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut c = Credentials::default();
        assert!(!c.is_set());
        assert_eq!(c.header_value(), "");

        c.set("s3cret".to_string());
        assert!(c.is_set());
        assert_eq!(c.header_value(), "s3cret");

        c.clear();
        assert!(!c.is_set());
        assert_eq!(c.header_value(), "");
    }

    #[test]
    fn empty_token_counts_as_cleared() {
        let c = Credentials::new(Some(String::new()));
        assert!(!c.is_set());
        let mut c = Credentials::new(Some("x".to_string()));
        c.set(String::new());
        assert!(!c.is_set());
    }

    #[test]
    fn debug_output_redacts_token() {
        let c = Credentials::new(Some("hunter2".to_string()));
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("redacted"));
    }
}
