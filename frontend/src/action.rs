use std::fmt;

/// The three toggle actions a feed button can carry.
#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionKind {
    Bookmark,
    Follow,
    Like,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Bookmark, ActionKind::Follow, ActionKind::Like];

    /// Fixed mutation endpoint, relative to the configured base url.
    pub fn path(self) -> &'static str {
        match self {
            ActionKind::Bookmark => "/ac/bookmark/",
            ActionKind::Follow => "/ac/follow/",
            ActionKind::Like => "/ac/like/",
        }
    }

    /// Form field carrying the resource identifier.
    pub fn id_field(self) -> &'static str {
        match self {
            ActionKind::Bookmark | ActionKind::Like => "post_id",
            ActionKind::Follow => "user_id",
        }
    }

    /// CSS selector matching every button of this kind.
    pub fn selector(self) -> &'static str {
        match self {
            ActionKind::Bookmark => ".bookmark",
            ActionKind::Follow => ".follow",
            ActionKind::Like => ".like",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Bookmark => "bookmark",
            ActionKind::Follow => "follow",
            ActionKind::Like => "like",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_is_the_only_user_keyed_action() {
        let user_keyed: Vec<_> = ActionKind::ALL
            .iter()
            .filter(|action| action.id_field() == "user_id")
            .collect();

        assert_eq!(user_keyed, vec![&ActionKind::Follow]);
    }

    #[test]
    fn selectors_match_names() {
        for action in ActionKind::ALL {
            assert_eq!(action.selector(), format!(".{}", action));
            assert!(action.path().starts_with("/ac/"));
        }
    }
}
