// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while running a transition.

use logo_explode_core::trace::FallbackReason;
use wasm_bindgen::{JsCast as _, JsValue};

/// Why a transition could not continue.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The request could not be sent or the connection failed.
    #[error("fetching the destination failed: {0}")]
    Fetch(String),
    /// The server answered with a non-success status.
    #[error("destination answered with status {0}")]
    Status(u16),
    /// The request was aborted after the configured timeout.
    #[error("destination did not answer within {0} ms")]
    Timeout(u32),
    /// The response body could not be turned into a document.
    #[error("destination could not be parsed: {0}")]
    Parse(String),
    /// A DOM call failed or a required node was missing.
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl TransitionError {
    /// Wraps a thrown JS value as a [`TransitionError::Dom`].
    pub(crate) fn dom(value: JsValue) -> Self {
        Self::Dom(describe(&value))
    }

    /// A [`TransitionError::Dom`] for a node that was not there.
    pub(crate) fn missing(what: &str) -> Self {
        Self::Dom(format!("missing {what}"))
    }

    /// Trace classification of this error.
    #[must_use]
    pub fn fallback_reason(&self) -> FallbackReason {
        match self {
            Self::Fetch(_) | Self::Status(_) => FallbackReason::Fetch,
            Self::Timeout(_) => FallbackReason::Timeout,
            Self::Parse(_) => FallbackReason::Parse,
            Self::Dom(_) => FallbackReason::Dom,
        }
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}
