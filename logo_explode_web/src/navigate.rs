// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaving the animated path.

use gloo::console;

use crate::dom;

/// Performs full-page navigations.
///
/// The engine uses [`BrowserNavigator`]; tests record the calls instead.
pub trait Navigator {
    /// Loads `url` as an ordinary navigation.
    fn navigate(&self, url: &str);

    /// Reloads the current page.
    fn reload(&self);
}

/// Drives `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        let result = dom::window().map(|w| w.location().assign(url));
        if !matches!(result, Ok(Ok(()))) {
            console::warn!("logo-explode: could not navigate to", url.to_owned());
        }
    }

    fn reload(&self) {
        if let Ok(window) = dom::window() {
            let _ = window.location().reload();
        }
    }
}
