use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::action::ActionKind;
use crate::config::ControllerConfig;
use crate::connection::Transport;
use crate::error::ToggleError;
use crate::page::{Page, ToggleButton};
use crate::render::{render, ButtonState};
use crate::toggle_request::ToggleRequest;
use crate::toggle_result::{self, ToggleResult};
use crate::token::AntiForgeryToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A request for the same button has not answered yet.
    InFlight,
    /// A 401 already sent the page into a reload.
    Reloading,
}

/// What a single click ended in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Rendered(ButtonState),
    /// New state recorded, markup left as it was.
    Recorded(ButtonState),
    Reloading,
    Failed(ToggleError),
    Ignored(IgnoreReason),
}

type Slot = (String, ActionKind);

#[derive(Default)]
struct ControllerState {
    reloading: bool,
    in_flight: HashSet<Slot>,
    buttons: HashMap<Slot, ButtonState>,
}

/// Sends toggle requests and reconciles the clicked button with the answer.
pub struct ToggleController<T, P> {
    config: ControllerConfig,
    token: AntiForgeryToken,
    transport: T,
    page: P,
    state: RefCell<ControllerState>,
}

impl<T, P> ToggleController<T, P>
where
    T: Transport,
    P: Page,
{
    pub fn new(config: ControllerConfig, token: AntiForgeryToken, transport: T, page: P) -> Self {
        ToggleController {
            config,
            token,
            transport,
            page,
            state: RefCell::new(ControllerState::default()),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn is_reloading(&self) -> bool {
        self.state.borrow().reloading
    }

    pub fn is_in_flight(&self, key: &str, action: ActionKind) -> bool {
        self.state
            .borrow()
            .in_flight
            .contains(&(key.to_owned(), action))
    }

    /// Last state confirmed by the server for this button.
    pub fn button_state(&self, key: &str, action: ActionKind) -> ButtonState {
        self.state
            .borrow()
            .buttons
            .get(&(key.to_owned(), action))
            .copied()
            .unwrap_or_default()
    }

    /// Full click cycle: one request, then at most one mutation of `button`.
    pub async fn handle_click<B: ToggleButton>(
        &self,
        action: ActionKind,
        button: &B,
    ) -> ClickOutcome {
        if self.is_reloading() {
            debug!("{} click ignored, page is reloading", action);
            return ClickOutcome::Ignored(IgnoreReason::Reloading);
        }

        let resource_id = match button.resource_id().filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => return self.fail(action, ToggleError::MissingResourceId),
        };

        let slot = (button.key(), action);
        if !self.state.borrow_mut().in_flight.insert(slot.clone()) {
            debug!("{} {} still pending, click ignored", action, resource_id);
            return ClickOutcome::Ignored(IgnoreReason::InFlight);
        }

        let result = self.dispatch(action, &resource_id).await;
        self.state.borrow_mut().in_flight.remove(&slot);

        match result {
            Err(ToggleError::SessionExpired) => self.expire_session(action),
            _ if self.is_reloading() => ClickOutcome::Ignored(IgnoreReason::Reloading),
            Ok(toggle) => self.reconcile(action, button, slot, &resource_id, toggle),
            Err(err) => self.fail(action, err),
        }
    }

    async fn dispatch(
        &self,
        action: ActionKind,
        resource_id: &str,
    ) -> Result<ToggleResult, ToggleError> {
        let body = ToggleRequest::new(action, resource_id, &self.config.token_field, &self.token)
            .encode()?;
        let url = self.config.endpoint(action);
        debug!("POST {} {}={}", url, action.id_field(), resource_id);

        let response = self.transport.post_form(&url, body).await?;

        match response.status {
            200 => toggle_result::decode(action, &response.body),
            401 => Err(ToggleError::SessionExpired),
            status => Err(ToggleError::Server(status)),
        }
    }

    fn reconcile<B: ToggleButton>(
        &self,
        action: ActionKind,
        button: &B,
        slot: Slot,
        resource_id: &str,
        result: ToggleResult,
    ) -> ClickOutcome {
        // only the clicked element is updated, even if the echo disagrees
        if let Some(echoed) = result.resource_id.as_deref() {
            if echoed != resource_id {
                warn!(
                    "{} response names {} but button {} carries {}",
                    action, echoed, slot.0, resource_id
                );
            }
        }

        let state = ButtonState::from(result.new_state);
        self.state.borrow_mut().buttons.insert(slot, state);

        match render(action, &result) {
            Some(rendering) => {
                button.apply(&rendering);
                debug!("{} {} -> {:?}", action, resource_id, state);
                ClickOutcome::Rendered(state)
            }
            None => {
                debug!("{} {} -> {:?}, markup unchanged", action, resource_id, state);
                ClickOutcome::Recorded(state)
            }
        }
    }

    fn expire_session(&self, action: ActionKind) -> ClickOutcome {
        let already = std::mem::replace(&mut self.state.borrow_mut().reloading, true);
        if !already {
            info!("{} answered 401, reloading page", action);
            self.page.reload();
        }

        ClickOutcome::Reloading
    }

    fn fail(&self, action: ActionKind, err: ToggleError) -> ClickOutcome {
        warn!("{} failed: {}", action, err);
        self.page.report_failure(action, &err);
        ClickOutcome::Failed(err)
    }
}
