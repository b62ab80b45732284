use crate::action::ActionKind;
use crate::error::ToggleError;

/// Authoritative post-mutation state as reported by the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleResult {
    /// Echoed resource id, when the endpoint sends one back.
    pub resource_id: Option<String>,
    pub new_state: bool,
    /// Updated counter; only the like endpoint sends one.
    pub auxiliary: Option<u64>,
}

/// Resource ids arrive either as JSON numbers or strings.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum WireId {
    Number(serde_json::Number),
    Text(String),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(number) => number.to_string(),
            WireId::Text(text) => text,
        }
    }
}

#[derive(Deserialize, Debug)]
struct BookmarkResponse {
    #[serde(default)]
    post_id: Option<WireId>,
    is_bookmarked: bool,
}

#[derive(Deserialize, Debug)]
struct FollowResponse {
    #[serde(default)]
    user_id: Option<WireId>,
    is_following: bool,
}

#[derive(Deserialize, Debug)]
struct LikeResponse {
    #[serde(default)]
    post_id: Option<WireId>,
    is_liked: bool,
    likes_count: u64,
}

/// Decodes a 200 response body for `action`. Missing or mistyped fields are a
/// `MalformedResponse`, never a panic.
pub fn decode(action: ActionKind, body: &str) -> Result<ToggleResult, ToggleError> {
    let malformed = |err: serde_json::Error| ToggleError::MalformedResponse(err.to_string());

    let result = match action {
        ActionKind::Bookmark => {
            let response: BookmarkResponse = serde_json::from_str(body).map_err(malformed)?;
            ToggleResult {
                resource_id: response.post_id.map(String::from),
                new_state: response.is_bookmarked,
                auxiliary: None,
            }
        }
        ActionKind::Follow => {
            let response: FollowResponse = serde_json::from_str(body).map_err(malformed)?;
            ToggleResult {
                resource_id: response.user_id.map(String::from),
                new_state: response.is_following,
                auxiliary: None,
            }
        }
        ActionKind::Like => {
            let response: LikeResponse = serde_json::from_str(body).map_err(malformed)?;
            ToggleResult {
                resource_id: response.post_id.map(String::from),
                new_state: response.is_liked,
                auxiliary: Some(response.likes_count),
            }
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookmark_with_numeric_post_id() {
        let result = decode(
            ActionKind::Bookmark,
            r#"{"post_id": 12, "is_bookmarked": true}"#,
        )
        .unwrap();

        assert_eq!(
            result,
            ToggleResult {
                resource_id: Some("12".into()),
                new_state: true,
                auxiliary: None,
            }
        );
    }

    #[test]
    fn follow_without_echoed_id() {
        let result = decode(ActionKind::Follow, r#"{"is_following": false}"#).unwrap();

        assert_eq!(result.resource_id, None);
        assert!(!result.new_state);
    }

    #[test]
    fn like_carries_count() {
        let result = decode(ActionKind::Like, r#"{"is_liked": true, "likes_count": 42}"#).unwrap();

        assert!(result.new_state);
        assert_eq!(result.auxiliary, Some(42));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let cases = [
            (ActionKind::Bookmark, r#"{"post_id": "12"}"#),
            (ActionKind::Follow, r#"{"is_bookmarked": true}"#),
            (ActionKind::Like, r#"{"is_liked": true}"#),
            (ActionKind::Like, r#"{"is_liked": "yes", "likes_count": 1}"#),
            (ActionKind::Bookmark, "<html>login</html>"),
            (ActionKind::Follow, ""),
        ];

        for (action, body) in cases {
            assert!(
                matches!(decode(action, body), Err(ToggleError::MalformedResponse(_))),
                "{} accepted {:?}",
                action,
                body
            );
        }
    }

    #[test]
    fn extra_fields_are_ignored() {
        let result = decode(
            ActionKind::Follow,
            r#"{"is_following": true, "followers": 3, "user_id": "x9"}"#,
        )
        .unwrap();

        assert_eq!(result.resource_id.as_deref(), Some("x9"));
    }

    #[test]
    fn ids_beyond_signed_range_are_kept() {
        let bookmark = decode(
            ActionKind::Bookmark,
            r#"{"post_id": 18446744073709551615, "is_bookmarked": true}"#,
        )
        .unwrap();
        let like = decode(
            ActionKind::Like,
            r#"{"post_id": -4, "is_liked": true, "likes_count": 1}"#,
        )
        .unwrap();

        assert_eq!(bookmark.resource_id.as_deref(), Some("18446744073709551615"));
        assert_eq!(like.resource_id.as_deref(), Some("-4"));
    }
}
