use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use gloo_events::EventListener;
use log::{debug, error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement, Window};

use crate::action::ActionKind;
use crate::config::ControllerConfig;
use crate::connection::FrontendConnection;
use crate::controller::ToggleController;
use crate::error::{SetupError, ToggleError};
use crate::page::{Page, ToggleButton};
use crate::registry::{BindingRegistry, BoundElement};
use crate::render::Rendering;
use crate::token::AntiForgeryToken;

/// Marks elements that already have a registry identity.
pub const KEY_ATTRIBUTE: &str = "data-toggle-key";

// shared by every app on the page so keys never collide
static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

pub type DomController = ToggleController<FrontendConnection, DomPage>;

#[derive(Clone, Debug)]
pub struct DomButton {
    element: HtmlElement,
}

impl DomButton {
    pub fn new(element: HtmlElement) -> Self {
        DomButton { element }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl ToggleButton for DomButton {
    fn key(&self) -> String {
        self.element.get_attribute(KEY_ATTRIBUTE).unwrap_or_default()
    }

    fn resource_id(&self) -> Option<String> {
        match self.element.dyn_ref::<HtmlButtonElement>() {
            Some(button) => Some(button.value()),
            None => self.element.get_attribute("value"),
        }
    }

    fn apply(&self, rendering: &Rendering) {
        match rendering {
            Rendering::Markup(markup) => self.element.set_inner_html(markup),
            Rendering::Labelled { label, class } => {
                self.element.set_inner_html(label);
                self.element.set_class_name(class);
            }
        }
    }
}

pub struct DomPage {
    window: Window,
    error_target_id: String,
}

impl DomPage {
    pub fn new(window: Window, error_target_id: String) -> Self {
        DomPage {
            window,
            error_target_id,
        }
    }
}

impl Page for DomPage {
    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            error!("page reload failed: {:?}", err);
        }
    }

    fn report_failure(&self, action: ActionKind, error: &ToggleError) {
        let target = self
            .window
            .document()
            .and_then(|document| document.get_element_by_id(&self.error_target_id));

        match target {
            Some(target) => target.set_text_content(Some(error.user_message())),
            None => warn!(
                "{} failed ({}), no #{} to report into",
                action, error, self.error_target_id
            ),
        }
    }
}

impl BoundElement for HtmlElement {
    fn same_element(&self, other: &Self) -> bool {
        self.is_same_node(Some(other.as_ref()))
    }

    fn is_live(&self) -> bool {
        self.is_connected()
    }
}

/// The controller wired to the live document.
pub struct ToggleApp {
    document: Document,
    controller: Rc<DomController>,
    registry: RefCell<BindingRegistry<String, HtmlElement, EventListener>>,
}

impl ToggleApp {
    /// Reads config and the anti-forgery token from the current document.
    pub fn from_document() -> Result<Self, SetupError> {
        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let document = window.document().ok_or(SetupError::NoDocument)?;

        let config = read_config(&document);
        let token = AntiForgeryToken::capture(&config.token_field, |field| {
            token_value(&document, field)
        })?;

        let page = DomPage::new(window.clone(), config.error_target_id.clone());
        let connection = FrontendConnection::new(window);
        let controller = ToggleController::new(config, token, connection, page);

        Ok(ToggleApp {
            document,
            controller: Rc::new(controller),
            registry: RefCell::new(BindingRegistry::new()),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        self.controller.config()
    }

    pub fn controller(&self) -> &Rc<DomController> {
        &self.controller
    }

    pub fn bound_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Binds every toggle button currently in the document. Buttons that
    /// are already bound are skipped and listeners of buttons that left the
    /// document are dropped. Returns the number of new bindings.
    pub fn bind_toggle_buttons(&self) -> Result<usize, SetupError> {
        let mut registry = self.registry.borrow_mut();
        let mut claimed: HashMap<String, HtmlElement> = HashMap::new();
        let mut found = Vec::new();

        for action in ActionKind::ALL {
            let nodes = self.document.query_selector_all(action.selector())?;

            for index in 0..nodes.length() {
                let Some(element) = nodes
                    .item(index)
                    .and_then(|node| node.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };

                let key = claim_key(&registry, &mut claimed, action, &element)?;
                found.push((key, action, element));
            }
        }

        let present: HashSet<(String, ActionKind)> = found
            .iter()
            .map(|(key, action, _)| (key.clone(), *action))
            .collect();
        let pruned = registry.prune(|key, action| present.contains(&(key.clone(), action)));
        if pruned > 0 {
            debug!("dropped {} listeners of removed buttons", pruned);
        }

        let mut bound = 0;
        for (key, action, element) in found {
            if registry.bind(key, action, element, |element| self.listen(action, element)) {
                bound += 1;
            }
        }

        Ok(bound)
    }

    fn listen(&self, action: ActionKind, element: &HtmlElement) -> EventListener {
        let controller = Rc::clone(&self.controller);
        let button = DomButton::new(element.clone());

        EventListener::new(element, "click", move |_event| {
            let controller = Rc::clone(&controller);
            let button = button.clone();

            spawn_local(async move {
                let outcome = controller.handle_click(action, &button).await;
                debug!("{} click on {}: {:?}", action, button.key(), outcome);
            });
        })
    }
}

/// Key under which `element` binds. Markup copied from a bound button carries
/// that button's key along, so a key already held by another live element,
/// in the registry or earlier in this pass, is replaced with a fresh one.
fn claim_key(
    registry: &BindingRegistry<String, HtmlElement, EventListener>,
    claimed: &mut HashMap<String, HtmlElement>,
    action: ActionKind,
    element: &HtmlElement,
) -> Result<String, SetupError> {
    if let Some(key) = element.get_attribute(KEY_ATTRIBUTE) {
        let taken_in_pass = claimed
            .get(&key)
            .map_or(false, |holder| !holder.same_element(element));

        if !taken_in_pass && registry.may_claim(&key, action, element) {
            claimed.insert(key.clone(), element.clone());
            return Ok(key);
        }

        debug!("{} carries copied key {}, assigning a new one", action, key);
    }

    let key = format!("toggle-{}", NEXT_KEY.fetch_add(1, Ordering::Relaxed));
    element.set_attribute(KEY_ATTRIBUTE, &key)?;
    claimed.insert(key.clone(), element.clone());

    Ok(key)
}

fn read_config(document: &Document) -> ControllerConfig {
    let body = document.body();
    ControllerConfig::from_lookup(|key| body.as_ref().and_then(|body| body.get_attribute(key)))
}

fn token_value(document: &Document, field: &str) -> Option<String> {
    document
        .query_selector(&format!("input[name=\"{}\"]", field))
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}
