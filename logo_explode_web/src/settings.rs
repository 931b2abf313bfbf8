// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading the host page's settings object.

use gloo::console;
use js_sys::{JSON, Reflect};
use logo_explode_core::config::EngineConfig;
use wasm_bindgen::JsValue;
use web_sys::Window;

/// Global the host page injects before the engine starts.
pub const SETTINGS_GLOBAL: &str = "wpLogoExplodeSettings";

/// Reads [`SETTINGS_GLOBAL`] from `window`.
///
/// A missing object yields the defaults. An object that cannot be read is
/// reported and also yields the defaults.
#[must_use]
pub fn load(window: &Window) -> EngineConfig {
    let value = Reflect::get(window, &JsValue::from_str(SETTINGS_GLOBAL)).unwrap_or(JsValue::NULL);
    if value.is_undefined() || value.is_null() {
        return EngineConfig::default();
    }
    let json = JSON::stringify(&value)
        .ok()
        .and_then(|s| s.as_string());
    let Some(json) = json else {
        console::warn!("logo-explode: settings are not serializable, using defaults");
        return EngineConfig::default();
    };
    match EngineConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            console::warn!("logo-explode: invalid settings, using defaults:", err.to_string());
            EngineConfig::default()
        }
    }
}
