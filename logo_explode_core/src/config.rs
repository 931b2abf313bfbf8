// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! The host page injects a settings object before the engine loads. Its
//! values come from a settings form, so numbers may arrive as strings and
//! booleans as `"1"`/`"0"`. [`RawSettings`] accepts any JSON shape per field;
//! [`EngineConfig::from_settings`] coerces each field independently and
//! falls back to that field's default when the value is missing or invalid.

use alloc::string::{String, ToString as _};

use serde::Deserialize;
use serde_json::Value;

/// Default duration of the outward (expand) animation, in milliseconds.
pub const DEFAULT_EXPAND_MS: u32 = 800;
/// Default duration of the inward (shrink) animation, in milliseconds.
pub const DEFAULT_SHRINK_MS: u32 = 800;
/// Default multiplier applied to the source size at full explosion.
pub const DEFAULT_EXPLODE_SCALE: f64 = 100.0;
/// Default pause after a swap before the target is measured.
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 200;
/// Default stacking order of the overlay layer.
pub const DEFAULT_Z_INDEX: i32 = 99_999;
/// Fixed duration of the fade used when the destination has no target.
pub const FADE_DURATION_MS: u32 = 300;

/// Settings object as injected by the host page.
///
/// Every field is optional and untyped; coercion happens in
/// [`EngineConfig::from_settings`]. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSettings {
    /// Expand duration in milliseconds.
    pub duration_expand: Option<Value>,
    /// Shrink duration in milliseconds.
    pub duration_shrink: Option<Value>,
    /// Explode scale multiplier.
    pub scale_explode: Option<Value>,
    /// Settle delay in milliseconds.
    pub layout_settle_delay: Option<Value>,
    /// Overlay z-index.
    pub z_index: Option<Value>,
    /// Whether to force the scroll position to the top after a swap.
    pub force_scroll_top: Option<Value>,
    /// Overlay background color (any CSS color).
    pub global_bg_color: Option<Value>,
    /// Upper bound on the destination fetch, in milliseconds. `0` disables it.
    pub fetch_timeout: Option<Value>,
    /// Whether to log transition diagnostics to the console.
    pub debug: Option<Value>,
}

/// Process-wide engine configuration, read once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Expand animation duration, in milliseconds.
    pub expand_duration_ms: u32,
    /// Shrink animation duration, in milliseconds.
    pub shrink_duration_ms: u32,
    /// Size multiplier of the clone at full explosion.
    pub explode_scale: f64,
    /// Pause after the swap before measuring the target, in milliseconds.
    pub settle_delay_ms: u32,
    /// Stacking order of the overlay.
    pub z_index: i32,
    /// Force the scroll position to the top around the swap.
    pub force_scroll_top: bool,
    /// Overlay background color used when a marker has none.
    pub global_bg_color: Option<String>,
    /// Abort the destination fetch after this many milliseconds.
    ///
    /// `None` keeps the fetch unbounded.
    pub fetch_timeout_ms: Option<u32>,
    /// Emit transition diagnostics to the console.
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expand_duration_ms: DEFAULT_EXPAND_MS,
            shrink_duration_ms: DEFAULT_SHRINK_MS,
            explode_scale: DEFAULT_EXPLODE_SCALE,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            z_index: DEFAULT_Z_INDEX,
            force_scroll_top: true,
            global_bg_color: None,
            fetch_timeout_ms: None,
            debug: false,
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from raw settings, field by field.
    #[must_use]
    pub fn from_settings(raw: &RawSettings) -> Self {
        let defaults = Self::default();
        Self {
            expand_duration_ms: raw
                .duration_expand
                .as_ref()
                .and_then(millis)
                .unwrap_or(defaults.expand_duration_ms),
            shrink_duration_ms: raw
                .duration_shrink
                .as_ref()
                .and_then(millis)
                .unwrap_or(defaults.shrink_duration_ms),
            explode_scale: raw
                .scale_explode
                .as_ref()
                .and_then(number)
                .filter(|s| *s > 0.0)
                .unwrap_or(defaults.explode_scale),
            settle_delay_ms: raw
                .layout_settle_delay
                .as_ref()
                .and_then(millis)
                .unwrap_or(defaults.settle_delay_ms),
            z_index: raw
                .z_index
                .as_ref()
                .and_then(number)
                .and_then(to_i32)
                .unwrap_or(defaults.z_index),
            force_scroll_top: raw
                .force_scroll_top
                .as_ref()
                .and_then(flag)
                .unwrap_or(defaults.force_scroll_top),
            global_bg_color: raw.global_bg_color.as_ref().and_then(text),
            fetch_timeout_ms: raw
                .fetch_timeout
                .as_ref()
                .and_then(millis)
                .filter(|ms| *ms > 0),
            debug: raw.debug.as_ref().and_then(flag).unwrap_or(defaults.debug),
        }
    }

    /// Parses a JSON settings document.
    ///
    /// Only a malformed document is an error; a well-formed one with bad
    /// field values still yields a configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawSettings = serde_json::from_str(json)?;
        Ok(Self::from_settings(&raw))
    }
}

/// Reads a finite number from a JSON number or a numeric string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Reads a non-negative millisecond count.
fn millis(value: &Value) -> Option<u32> {
    let n = number(value)?;
    if n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "range checked above; rounding to whole milliseconds"
    )]
    let ms = (n + 0.5) as u32;
    Some(ms)
}

fn to_i32(n: f64) -> Option<i32> {
    if n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range checked above; z-index is integral"
    )]
    let z = n as i32;
    Some(z)
}

/// Reads a boolean from the shapes a settings form produces.
fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim() {
            "1" | "true" | "yes" | "on" => Some(true),
            "" | "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
