use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::connection::TransportError;

/// Why a single click did not end in a rendered button.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ToggleError {
    /// HTTP 401. The only recovery is a full page reload.
    #[error("session expired")]
    SessionExpired,

    #[error("server answered with status {0}")]
    Server(u16),

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("button has no resource id")]
    MissingResourceId,

    #[error("could not encode request: {0}")]
    Encode(String),
}

impl ToggleError {
    /// Short text shown to the user in the error target.
    pub fn user_message(&self) -> &'static str {
        match self {
            ToggleError::SessionExpired => "Your session has expired.",
            ToggleError::MissingResourceId | ToggleError::Encode(_) => {
                "This action is not available."
            }
            _ => "Something went wrong. Please try again.",
        }
    }
}

/// Failures while wiring the controller to the page.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("anti-forgery token field `{0}` missing or empty")]
    MissingToken(String),

    #[error("dom error: {0}")]
    Dom(String),
}

impl From<JsValue> for SetupError {
    fn from(value: JsValue) -> Self {
        SetupError::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<SetupError> for JsValue {
    fn from(err: SetupError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
