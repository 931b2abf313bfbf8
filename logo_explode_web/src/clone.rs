// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building the animated stand-in for a live element.

use kurbo::Rect;
use logo_explode_core::marker::{
    ATTR_ANIMATE_SELECTOR, ATTR_COLOR, ATTR_DURATION_EXPAND, ATTR_DURATION_SHRINK, ATTR_ID,
    ATTR_LINK, ATTR_OFFSET_X, ATTR_OFFSET_Y, ATTR_ROLE, ATTR_SCALE_EXPLODE,
};
use wasm_bindgen::JsCast as _;
use web_sys::{Element, Window};

use crate::dom;
use crate::error::TransitionError;
use crate::geometry::{content_box, resolve_icon_rect, resolve_rect};

const MARKER_ATTRS: [&str; 10] = [
    ATTR_ID,
    ATTR_ROLE,
    ATTR_LINK,
    ATTR_COLOR,
    ATTR_ANIMATE_SELECTOR,
    ATTR_DURATION_EXPAND,
    ATTR_DURATION_SHRINK,
    ATTR_SCALE_EXPLODE,
    ATTR_OFFSET_X,
    ATTR_OFFSET_Y,
];

/// A detached clone and where it should start.
#[derive(Debug)]
pub(crate) struct CloneParts {
    pub(crate) element: Element,
    pub(crate) start: Rect,
    /// The clone shows only the icon of a nested icon grid.
    pub(crate) cropped_icon: bool,
}

/// Clones `animatable` for the overlay.
///
/// When `animatable` is an icon grid (an `<svg>` wrapping another `<svg>`)
/// and `crop_icons` is set, only the inner `<svg>` is cloned and its viewBox
/// is narrowed to the drawn content.
pub(crate) fn build(
    window: &Window,
    animatable: &Element,
    crop_icons: bool,
) -> Result<CloneParts, TransitionError> {
    let inner = crop_icons.then(|| dom::icon_inner(animatable)).flatten();
    let (original, start, cropped_icon) = match &inner {
        Some(inner) => (inner, resolve_icon_rect(inner), true),
        None => (animatable, resolve_rect(animatable), false),
    };
    let element: Element = original
        .clone_node_with_deep(true)
        .map_err(TransitionError::dom)?
        .dyn_into()
        .map_err(|_| TransitionError::missing("cloned element"))?;

    if cropped_icon && let Some(content) = content_box(original) {
        let view_box = format!(
            "{} {} {} {}",
            content.x0,
            content.y0,
            content.width(),
            content.height()
        );
        let _ = element.set_attribute("viewBox", &view_box);
    }
    normalize(window, original, &element);
    dom::place(&element, start);
    Ok(CloneParts {
        element,
        start,
        cropped_icon,
    })
}

fn normalize(window: &Window, original: &Element, clone: &Element) {
    // The clone must never be mistaken for a marker.
    for attr in MARKER_ATTRS {
        let _ = clone.remove_attribute(attr);
    }
    let _ = clone.remove_attribute("id");
    let _ = clone.class_list().add_1("transition-clone");
    // A live element may already be hidden by this or an earlier session.
    if let Some(style) = dom::inline_style(clone) {
        let _ = style.remove_property("opacity");
        let _ = style.remove_property("visibility");
    }

    let fill = window
        .get_computed_style(original)
        .ok()
        .flatten()
        .and_then(|s| s.get_property_value("fill").ok())
        .unwrap_or_default();
    dom::set_styles(
        clone,
        &[
            ("position", "absolute"),
            ("margin", "0"),
            ("transform", "none"),
            ("box-sizing", "border-box"),
            ("max-width", "none"),
            ("max-height", "none"),
        ],
    );
    if !fill.is_empty() {
        dom::set_styles(clone, &[("fill", fill.as_str())]);
    }
    for child in dom::query_all(clone, "svg, img") {
        dom::set_styles(&child, &[("width", "100%"), ("height", "100%")]);
    }
}
