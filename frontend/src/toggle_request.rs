use crate::action::ActionKind;
use crate::error::ToggleError;
use crate::token::AntiForgeryToken;

/// One form-encoded mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest<'a> {
    pub action: ActionKind,
    pub resource_id: &'a str,
    pub token_field: &'a str,
    pub token: &'a AntiForgeryToken,
}

impl<'a> ToggleRequest<'a> {
    pub fn new(
        action: ActionKind,
        resource_id: &'a str,
        token_field: &'a str,
        token: &'a AntiForgeryToken,
    ) -> Self {
        ToggleRequest {
            action,
            resource_id,
            token_field,
            token,
        }
    }

    /// `application/x-www-form-urlencoded` body, id field first.
    pub fn encode(&self) -> Result<String, ToggleError> {
        let pairs = [
            (self.action.id_field(), self.resource_id),
            (self.token_field, self.token.as_str()),
        ];

        serde_urlencoded::to_string(pairs).map_err(|err| ToggleError::Encode(err.to_string()))
    }
}
