// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading destination pages.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast as _;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Document, DomParser, RequestInit, Response, SupportedType};

use crate::dom;
use crate::error::{TransitionError, describe};

/// Future returned by [`PageSource::fetch`].
pub type PageFuture = Pin<Box<dyn Future<Output = Result<String, TransitionError>>>>;

/// Where destination HTML comes from.
///
/// The engine uses [`HttpPageSource`]; tests substitute canned pages.
pub trait PageSource {
    /// Loads the HTML of `url`.
    fn fetch(&self, url: &str) -> PageFuture;
}

/// `fetch()`-backed page source.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpPageSource {
    timeout_ms: Option<u32>,
}

impl HttpPageSource {
    /// A source that aborts requests after `timeout_ms`, if given.
    #[must_use]
    pub fn new(timeout_ms: Option<u32>) -> Self {
        Self { timeout_ms }
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> PageFuture {
        Box::pin(fetch_text(url.to_owned(), self.timeout_ms))
    }
}

async fn fetch_text(url: String, timeout_ms: Option<u32>) -> Result<String, TransitionError> {
    let window = dom::window()?;
    let controller = AbortController::new().map_err(TransitionError::dom)?;
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_signal(Some(&controller.signal()));

    let timed_out = Rc::new(Cell::new(false));
    // Dropping the timeout at the end of this function cancels it.
    let _timer = timeout_ms.map(|ms| {
        let timed_out = Rc::clone(&timed_out);
        let controller = controller.clone();
        Timeout::new(ms, move || {
            timed_out.set(true);
            controller.abort();
        })
    });
    let failed = |err: wasm_bindgen::JsValue| match timeout_ms {
        Some(ms) if timed_out.get() => TransitionError::Timeout(ms),
        _ => TransitionError::Fetch(describe(&err)),
    };

    let response: Response = JsFuture::from(window.fetch_with_str_and_init(&url, &init))
        .await
        .map_err(failed)?
        .dyn_into()
        .map_err(|_| TransitionError::Fetch("fetch did not yield a Response".into()))?;
    if !response.ok() {
        return Err(TransitionError::Status(response.status()));
    }
    let body = response.text().map_err(failed)?;
    let text = JsFuture::from(body).await.map_err(failed)?;
    text.as_string()
        .ok_or_else(|| TransitionError::Parse("response body is not text".into()))
}

/// Parses `html` into a detached document.
pub(crate) fn parse_document(html: &str) -> Result<Document, TransitionError> {
    let parser = DomParser::new().map_err(|e| TransitionError::Parse(describe(&e)))?;
    let doc = parser
        .parse_from_string(html, SupportedType::TextHtml)
        .map_err(|e| TransitionError::Parse(describe(&e)))?;
    if doc.body().is_none() {
        return Err(TransitionError::Parse("document has no body".into()));
    }
    Ok(doc)
}
