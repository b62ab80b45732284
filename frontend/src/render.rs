use crate::action::ActionKind;
use crate::toggle_result::ToggleResult;

pub const BOOKMARK_FILLED: &str = r#"<i class="fas fa-bookmark"></i>"#;
pub const BOOKMARK_OUTLINE: &str = r#"<i class="far fa-bookmark"></i>"#;
pub const LIKE_FILLED: &str = r#"<i class="fas fa-heart"></i>"#;

pub const FOLLOWING_LABEL: &str = "Following";
pub const FOLLOW_LABEL: &str = "Follow";
pub const FOLLOWING_CLASS: &str = "btn btn-sm btn-outline-primary follow";
pub const FOLLOW_CLASS: &str = "btn btn-sm btn-primary follow";

/// Per-button state. `Unset` is whatever the server template rendered.
#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Unset,
    Active,
    Inactive,
}

impl From<bool> for ButtonState {
    fn from(new_state: bool) -> Self {
        if new_state {
            ButtonState::Active
        } else {
            ButtonState::Inactive
        }
    }
}

/// A DOM mutation applied to the clicked button only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendering {
    /// Replace the inner markup.
    Markup(String),
    /// Replace the text and the whole class attribute.
    Labelled {
        label: &'static str,
        class: &'static str,
    },
}

/// Rendering for a decoded result. `None` means the button keeps its
/// current markup: an unliked post has no rendering of its own.
pub fn render(action: ActionKind, result: &ToggleResult) -> Option<Rendering> {
    match (action, result.new_state) {
        (ActionKind::Bookmark, true) => Some(Rendering::Markup(BOOKMARK_FILLED.to_owned())),
        (ActionKind::Bookmark, false) => Some(Rendering::Markup(BOOKMARK_OUTLINE.to_owned())),
        (ActionKind::Follow, true) => Some(Rendering::Labelled {
            label: FOLLOWING_LABEL,
            class: FOLLOWING_CLASS,
        }),
        (ActionKind::Follow, false) => Some(Rendering::Labelled {
            label: FOLLOW_LABEL,
            class: FOLLOW_CLASS,
        }),
        (ActionKind::Like, true) => {
            let count = result.auxiliary.unwrap_or_default();
            Some(Rendering::Markup(format!("{} {}", LIKE_FILLED, count)))
        }
        (ActionKind::Like, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(new_state: bool, auxiliary: Option<u64>) -> ToggleResult {
        ToggleResult {
            resource_id: None,
            new_state,
            auxiliary,
        }
    }

    #[test]
    fn bookmark_icons() {
        assert_eq!(
            render(ActionKind::Bookmark, &result(true, None)),
            Some(Rendering::Markup(r#"<i class="fas fa-bookmark"></i>"#.into()))
        );
        assert_eq!(
            render(ActionKind::Bookmark, &result(false, None)),
            Some(Rendering::Markup(r#"<i class="far fa-bookmark"></i>"#.into()))
        );
    }

    #[test]
    fn follow_label_and_class() {
        let Some(Rendering::Labelled { label, class }) =
            render(ActionKind::Follow, &result(true, None))
        else {
            panic!("follow must render a label");
        };
        assert_eq!(label, "Following");
        assert!(class.split(' ').any(|c| c == "btn-outline-primary"));

        let Some(Rendering::Labelled { label, class }) =
            render(ActionKind::Follow, &result(false, None))
        else {
            panic!("follow must render a label");
        };
        assert_eq!(label, "Follow");
        assert!(class.split(' ').any(|c| c == "btn-primary"));
        assert!(!class.split(' ').any(|c| c == "btn-outline-primary"));
    }

    #[test]
    fn like_shows_server_count() {
        assert_eq!(
            render(ActionKind::Like, &result(true, Some(42))),
            Some(Rendering::Markup(
                r#"<i class="fas fa-heart"></i> 42"#.into()
            ))
        );
        assert_eq!(render(ActionKind::Like, &result(false, Some(41))), None);
    }

    #[test]
    fn same_state_renders_identically() {
        for action in ActionKind::ALL {
            for state in [true, false] {
                assert_eq!(
                    render(action, &result(state, Some(3))),
                    render(action, &result(state, Some(3)))
                );
            }
        }
    }

    #[test]
    fn button_state_from_bool() {
        assert_eq!(ButtonState::from(true), ButtonState::Active);
        assert_eq!(ButtonState::from(false), ButtonState::Inactive);
        assert_eq!(ButtonState::default(), ButtonState::Unset);
    }
}
