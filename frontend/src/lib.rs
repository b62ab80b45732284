extern crate console_error_panic_hook;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod action;
pub mod config;
pub mod connection;
pub mod controller;
pub mod dom;
pub mod error;
pub mod logger;
pub mod page;
pub mod registry;
pub mod render;
pub mod token;
pub mod toggle_request;
pub mod toggle_result;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::dom::ToggleApp;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(contents: &str);

    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    pub fn console_warn(contents: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(contents: &str);
}

thread_local! {
    static APP: RefCell<Option<Rc<ToggleApp>>> = RefCell::new(None);
}

/// Entry point called once the page has loaded. Captures the anti-forgery
/// token and binds every bookmark, follow and like button on the page.
#[wasm_bindgen]
pub fn bootstrap() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    logger::init(log::LevelFilter::Info);
    let app = Rc::new(ToggleApp::from_document()?);
    logger::init(app.config().log_level);

    let bound = app.bind_toggle_buttons()?;
    log::info!("toggle buttons bound: {}", bound);

    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Re-binds after the feed re-rendered part of the page. Buttons that are
/// already bound keep their single listener; returns the number of newly
/// bound buttons.
#[wasm_bindgen]
pub fn rebind() -> Result<usize, JsValue> {
    let app = APP
        .with(|slot| slot.borrow().clone())
        .ok_or_else(|| JsValue::from_str("bootstrap() has not been called"))?;

    Ok(app.bind_toggle_buttons()?)
}
