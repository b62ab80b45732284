use std::fmt;

use crate::error::SetupError;

/// Hidden input name the server templates render the token into.
pub const CSRF_FIELD_NAME: &str = "csrfmiddlewaretoken";

/// Page-wide anti-forgery token. Captured once at startup and echoed
/// verbatim on every mutation request; there is no way to replace it short of
/// a page reload.
#[derive(Clone, PartialEq, Eq)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    /// Reads the token named `field` through `lookup`. A missing or empty
    /// value means the page was rendered without a session form.
    pub fn capture<F>(field: &str, lookup: F) -> Result<Self, SetupError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(field) {
            Some(value) if !value.is_empty() => Ok(AntiForgeryToken(value)),
            _ => Err(SetupError::MissingToken(field.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// keep the secret out of logs
impl fmt::Debug for AntiForgeryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AntiForgeryToken(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_keeps_value_verbatim() {
        let token = AntiForgeryToken::capture(CSRF_FIELD_NAME, |field| {
            assert_eq!(field, "csrfmiddlewaretoken");
            Some(" abc+/= ".to_owned())
        })
        .unwrap();

        assert_eq!(token.as_str(), " abc+/= ");
    }

    #[test]
    fn missing_or_empty_token_is_rejected() {
        assert!(matches!(
            AntiForgeryToken::capture(CSRF_FIELD_NAME, |_| None),
            Err(SetupError::MissingToken(field)) if field == CSRF_FIELD_NAME
        ));
        assert!(AntiForgeryToken::capture(CSRF_FIELD_NAME, |_| Some(String::new())).is_err());
    }

    #[test]
    fn debug_does_not_leak() {
        let token = AntiForgeryToken::capture("t", |_| Some("secret".into())).unwrap();
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
