// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `data-transition-*` attribute contract.
//!
//! Markup collaborators stamp these attributes onto elements; the engine only
//! reads them. A marker groups a source and a target by an opaque id. Numeric
//! overrides that are absent, non-numeric, or zero defer to the global
//! [`EngineConfig`].

use alloc::string::{String, ToString as _};

use kurbo::Vec2;

use crate::config::EngineConfig;

/// Opaque id grouping a source with its target.
pub const ATTR_ID: &str = "data-transition-id";
/// `source` or `target`.
pub const ATTR_ROLE: &str = "data-transition-role";
/// Destination URL of a source.
pub const ATTR_LINK: &str = "data-transition-link";
/// Overlay background color.
pub const ATTR_COLOR: &str = "data-transition-color";
/// Selector of a nested element to animate. Reserved; carried but unused.
pub const ATTR_ANIMATE_SELECTOR: &str = "data-transition-animate-selector";
/// Expand duration override, in milliseconds.
pub const ATTR_DURATION_EXPAND: &str = "data-transition-duration-expand";
/// Shrink duration override, in milliseconds.
pub const ATTR_DURATION_SHRINK: &str = "data-transition-duration-shrink";
/// Explode scale override.
pub const ATTR_SCALE_EXPLODE: &str = "data-transition-scale-explode";
/// Horizontal landing offset of a target, in pixels.
pub const ATTR_OFFSET_X: &str = "data-transition-offset-x";
/// Vertical landing offset of a target, in pixels.
pub const ATTR_OFFSET_Y: &str = "data-transition-offset-y";

/// Anything that can answer attribute lookups, typically a DOM element.
pub trait AttributeSource {
    /// Returns the attribute value, or `None` when it is not set.
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Which end of a transition a marker describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The element clicked on the current page.
    Source,
    /// The element the clone lands on in the destination page.
    Target,
}

impl Role {
    /// Parses the attribute value. Matching is exact.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "source" => Some(Self::Source),
            "target" => Some(Self::Target),
            _ => None,
        }
    }

    /// The attribute value for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

/// Per-marker overrides of the global animation settings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarkerOverrides {
    /// Expand duration, in milliseconds.
    pub expand_ms: Option<u32>,
    /// Shrink duration, in milliseconds.
    pub shrink_ms: Option<u32>,
    /// Explode scale multiplier.
    pub explode_scale: Option<f64>,
}

/// Animation parameters after overrides have been applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effective {
    /// Expand duration, in milliseconds.
    pub expand_ms: u32,
    /// Shrink duration, in milliseconds.
    pub shrink_ms: u32,
    /// Explode scale multiplier.
    pub explode_scale: f64,
}

impl MarkerOverrides {
    /// Applies these overrides on top of `config`.
    #[must_use]
    pub fn resolve(&self, config: &EngineConfig) -> Effective {
        Effective {
            expand_ms: self.expand_ms.unwrap_or(config.expand_duration_ms),
            shrink_ms: self.shrink_ms.unwrap_or(config.shrink_duration_ms),
            explode_scale: self.explode_scale.unwrap_or(config.explode_scale),
        }
    }
}

/// All transition attributes of one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionMarker {
    /// Group id. Empty ids are treated as absent.
    pub id: Option<String>,
    /// Declared role, if recognized.
    pub role: Option<Role>,
    /// Destination URL (sources only).
    pub link: Option<String>,
    /// Overlay background color.
    pub color: Option<String>,
    /// Reserved selector for nested-element cloning.
    pub animate_selector: Option<String>,
    /// Animation overrides.
    pub overrides: MarkerOverrides,
    /// Landing offset in pixels (targets only; zero for sources).
    pub offset: Vec2,
}

impl TransitionMarker {
    /// Reads every transition attribute from `source`.
    #[must_use]
    pub fn read<S: AttributeSource + ?Sized>(source: &S) -> Self {
        let role = source.attribute(ATTR_ROLE).as_deref().and_then(Role::parse);
        let offset = if role == Some(Role::Target) {
            Vec2::new(
                source
                    .attribute(ATTR_OFFSET_X)
                    .as_deref()
                    .and_then(parse_number)
                    .unwrap_or(0.0),
                source
                    .attribute(ATTR_OFFSET_Y)
                    .as_deref()
                    .and_then(parse_number)
                    .unwrap_or(0.0),
            )
        } else {
            Vec2::ZERO
        };

        Self {
            id: non_empty(source.attribute(ATTR_ID)),
            role,
            link: non_empty(source.attribute(ATTR_LINK)),
            color: non_empty(source.attribute(ATTR_COLOR)),
            animate_selector: non_empty(source.attribute(ATTR_ANIMATE_SELECTOR)),
            overrides: MarkerOverrides {
                expand_ms: positive(source.attribute(ATTR_DURATION_EXPAND)).and_then(whole_ms),
                shrink_ms: positive(source.attribute(ATTR_DURATION_SHRINK)).and_then(whole_ms),
                explode_scale: positive(source.attribute(ATTR_SCALE_EXPLODE)),
            },
            offset,
        }
    }

    /// Overlay background for a session started from this marker.
    ///
    /// The marker's own color wins over the global one.
    #[must_use]
    pub fn overlay_color<'a>(&'a self, config: &'a EngineConfig) -> Option<&'a str> {
        self.color
            .as_deref()
            .or(config.global_bg_color.as_deref())
    }
}

/// Selector matching every source marker.
pub const SOURCE_SELECTOR: &str = "[data-transition-role=\"source\"]";

/// Selector matching the target marker for `id`.
#[must_use]
pub fn target_selector(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 64);
    out.push('[');
    out.push_str(ATTR_ID);
    out.push_str("=\"");
    push_css_string(&mut out, id);
    out.push_str("\"][");
    out.push_str(ATTR_ROLE);
    out.push_str("=\"target\"]");
    out
}

/// Appends `value` escaped for a double-quoted CSS string.
fn push_css_string(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            '\0' => out.push('\u{FFFD}'),
            _ => out.push(c),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    let v = value?;
    let trimmed = v.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == v.len() {
        Some(v)
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Numeric override; zero and negatives mean "not set".
fn positive(value: Option<String>) -> Option<f64> {
    value
        .as_deref()
        .and_then(parse_number)
        .filter(|n| *n > 0.0)
}

fn whole_ms(n: f64) -> Option<u32> {
    if n > f64::from(u32::MAX) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive and range checked; rounding to whole milliseconds"
    )]
    let ms = (n + 0.5) as u32;
    Some(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    struct Attrs(Vec<(&'static str, &'static str)>);

    impl AttributeSource for Attrs {
        fn attribute(&self, name: &str) -> Option<String> {
            self.0
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn reads_source_marker() {
        let attrs = Attrs(alloc::vec![
            (ATTR_ID, "logo"),
            (ATTR_ROLE, "source"),
            (ATTR_LINK, "/about"),
            (ATTR_DURATION_EXPAND, "500"),
            (ATTR_SCALE_EXPLODE, "0"),
            (ATTR_OFFSET_X, "12"),
        ]);
        let marker = TransitionMarker::read(&attrs);
        assert_eq!(marker.id.as_deref(), Some("logo"));
        assert_eq!(marker.role, Some(Role::Source));
        assert_eq!(marker.link.as_deref(), Some("/about"));
        assert_eq!(marker.overrides.expand_ms, Some(500));
        assert_eq!(marker.overrides.explode_scale, None, "zero is not an override");
        assert_eq!(marker.offset, Vec2::ZERO, "offsets only apply to targets");
    }

    #[test]
    fn reads_target_offsets() {
        let attrs = Attrs(alloc::vec![
            (ATTR_ID, "logo"),
            (ATTR_ROLE, "target"),
            (ATTR_OFFSET_X, "-4"),
            (ATTR_OFFSET_Y, "7.5"),
        ]);
        let marker = TransitionMarker::read(&attrs);
        assert_eq!(marker.role, Some(Role::Target));
        assert_eq!(marker.offset, Vec2::new(-4.0, 7.5));
    }

    #[test]
    fn blank_id_and_unknown_role_are_absent() {
        let attrs = Attrs(alloc::vec![(ATTR_ID, "  "), (ATTR_ROLE, "Source")]);
        let marker = TransitionMarker::read(&attrs);
        assert_eq!(marker.id, None);
        assert_eq!(marker.role, None);
    }

    #[test]
    fn overrides_fall_back_to_config() {
        let config = EngineConfig::default();
        let eff = MarkerOverrides {
            shrink_ms: Some(250),
            ..MarkerOverrides::default()
        }
        .resolve(&config);
        assert_eq!(eff.expand_ms, 800);
        assert_eq!(eff.shrink_ms, 250);
        assert_eq!(eff.explode_scale, 100.0);

        let garbage = Attrs(alloc::vec![(ATTR_DURATION_SHRINK, "slow")]);
        let eff = TransitionMarker::read(&garbage).overrides.resolve(&config);
        assert_eq!(eff.shrink_ms, 800, "non-numeric override is ignored");
    }

    #[test]
    fn overlay_color_prefers_marker() {
        let mut config = EngineConfig::default();
        let mut marker = TransitionMarker::default();
        assert_eq!(marker.overlay_color(&config), None);
        config.global_bg_color = Some("black".into());
        assert_eq!(marker.overlay_color(&config), Some("black"));
        marker.color = Some("#fff".into());
        assert_eq!(marker.overlay_color(&config), Some("#fff"));
    }

    #[test]
    fn target_selector_escapes_quotes() {
        assert_eq!(
            target_selector("logo"),
            r#"[data-transition-id="logo"][data-transition-role="target"]"#
        );
        assert_eq!(
            target_selector(r#"a"b\c"#),
            r#"[data-transition-id="a\"b\\c"][data-transition-role="target"]"#
        );
    }
}
