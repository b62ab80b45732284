use futures_util::future::LocalBoxFuture;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response, Window};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Network level failure: nothing usable came back.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<JsValue> for TransportError {
    fn from(value: JsValue) -> Self {
        TransportError(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// Status and raw body of a finished request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Issues form-encoded POSTs. Single threaded, so futures need not be `Send`.
pub trait Transport {
    fn post_form(
        &self,
        url: &str,
        body: String,
    ) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>>;
}

/// `fetch` against the page's own origin, sending the session cookie.
pub struct FrontendConnection {
    window: Window,
}

impl FrontendConnection {
    pub fn new(window: Window) -> Self {
        FrontendConnection { window }
    }

    fn build_request(url: &str, body: &str) -> Result<Request, TransportError> {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_credentials(RequestCredentials::SameOrigin);
        init.set_body(&JsValue::from_str(body));

        let request = Request::new_with_str_and_init(url, &init)?;
        let headers = request.headers();
        headers.set("Content-Type", FORM_CONTENT_TYPE)?;
        headers.set("X-Requested-With", "XMLHttpRequest")?;

        Ok(request)
    }
}

impl Transport for FrontendConnection {
    fn post_form(
        &self,
        url: &str,
        body: String,
    ) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        let sent = Self::build_request(url, &body)
            .map(|request| JsFuture::from(self.window.fetch_with_request(&request)));

        Box::pin(async move {
            let response: Response = sent?.await?.dyn_into()?;
            let status = response.status();

            let body = JsFuture::from(response.text()?)
                .await?
                .as_string()
                .unwrap_or_default();

            Ok(HttpResponse { status, body })
        })
    }
}
