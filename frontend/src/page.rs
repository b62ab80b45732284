use crate::action::ActionKind;
use crate::error::ToggleError;
use crate::render::Rendering;

/// The clicked control, as seen by the controller.
pub trait ToggleButton {
    /// Stable identity of the element for the lifetime of the page.
    fn key(&self) -> String;

    /// Value attribute of the button.
    fn resource_id(&self) -> Option<String>;

    fn apply(&self, rendering: &Rendering);
}

/// Page-wide effects.
pub trait Page {
    /// Full reload; the server re-renders every button from its own state.
    fn reload(&self);

    /// Makes a failed click visible to the user.
    fn report_failure(&self, action: ActionKind, error: &ToggleError);
}
