// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The DOM side of one transition session.
//!
//! A [`Session`] owns exactly what it created (the overlay and the clone)
//! and what it hid (live elements, with their previous inline opacity).
//! [`Session::teardown`] is the only routine that gives them back.

use std::rc::Rc;

use gloo::console;
use kurbo::Rect;
use logo_explode_core::session::{Phase, PhaseMachine, SessionLedger, Visible};
use logo_explode_core::trace::{FallbackEvent, PhaseEvent};
use web_sys::Element;

use crate::clone;
use crate::context::EngineContext;
use crate::dom;
use crate::error::TransitionError;
use crate::frame::now_ms;

/// A live element hidden for the duration of a session.
#[derive(Debug)]
pub(crate) struct Hidden {
    element: Element,
    prior_opacity: String,
}

impl Hidden {
    /// Hides `element`, remembering its inline opacity.
    pub(crate) fn hide(element: Element) -> Self {
        let prior_opacity = dom::inline_style(&element)
            .and_then(|s| s.get_property_value("opacity").ok())
            .unwrap_or_default();
        dom::set_styles(&element, &[("opacity", "0")]);
        Self {
            element,
            prior_opacity,
        }
    }

    fn restore(self) {
        let Some(style) = dom::inline_style(&self.element) else {
            return;
        };
        if self.prior_opacity.is_empty() {
            let _ = style.remove_property("opacity");
        } else {
            let _ = style.set_property("opacity", &self.prior_opacity);
        }
    }
}

/// One transition in flight.
pub(crate) struct Session {
    ctx: Rc<EngineContext>,
    id: String,
    machine: PhaseMachine,
    ledger: SessionLedger,
    overlay: Option<Element>,
    clone: Option<Element>,
    rect: Rect,
    cropped_icon: bool,
    hidden: Vec<Hidden>,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("phase", &self.machine.phase())
            .field("visible", &self.ledger.visible())
            .field("rect", &self.rect)
            .field("cropped_icon", &self.cropped_icon)
            .field("hidden", &self.hidden.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub(crate) fn new(ctx: Rc<EngineContext>, id: String) -> Self {
        ctx.begin_session(&id);
        Self {
            ctx,
            id,
            machine: PhaseMachine::new(),
            ledger: SessionLedger::new(),
            overlay: None,
            clone: None,
            rect: Rect::ZERO,
            cropped_icon: false,
            hidden: Vec::new(),
        }
    }

    pub(crate) fn ctx(&self) -> &Rc<EngineContext> {
        &self.ctx
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub(crate) fn overlay(&self) -> Option<&Element> {
        self.overlay.as_ref()
    }

    pub(crate) fn clone_element(&self) -> Option<&Element> {
        self.clone.as_ref()
    }

    /// Current rectangle of the clone.
    pub(crate) fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub(crate) fn cropped_icon(&self) -> bool {
        self.cropped_icon
    }

    /// Moves to `to` and reports it.
    pub(crate) fn advance(&mut self, to: Phase) {
        match self.machine.advance(to) {
            Ok(from) => self.ctx.trace(|t| {
                t.phase(&PhaseEvent {
                    id: &self.id,
                    from,
                    to,
                    at_ms: now_ms(),
                });
            }),
            Err(err) => console::warn!("logo-explode:", err.to_string()),
        }
    }

    /// Builds the overlay and the clone of `animatable`, then hands
    /// visibility from the live element to the clone.
    pub(crate) fn stage(
        &mut self,
        animatable: &Element,
        color: Option<&str>,
    ) -> Result<(), TransitionError> {
        let window = dom::window()?;
        let doc = dom::document()?;
        let body = doc.body().ok_or_else(|| TransitionError::missing("body"))?;
        let parts = clone::build(&window, animatable, true)?;

        let overlay = doc.create_element("div").map_err(TransitionError::dom)?;
        overlay.set_class_name("transition-overlay");
        let z_index = self.ctx.config().z_index.to_string();
        dom::set_styles(
            &overlay,
            &[
                ("position", "fixed"),
                ("inset", "0"),
                ("pointer-events", "none"),
                ("overflow", "hidden"),
                ("z-index", z_index.as_str()),
            ],
        );
        if let Some(color) = color {
            dom::set_styles(&overlay, &[("background-color", color)]);
        }
        self.rect = parts.start;
        self.cropped_icon = parts.cropped_icon;
        self.overlay = Some(overlay.clone());
        self.clone = Some(parts.element.clone());

        overlay
            .append_child(&parts.element)
            .map_err(TransitionError::dom)?;
        body.append_child(&overlay).map_err(TransitionError::dom)?;
        self.hidden.push(Hidden::hide(animatable.clone()));
        self.ledger.hand_to_clone();
        Ok(())
    }

    /// Takes over a live element that was hidden elsewhere.
    pub(crate) fn adopt(&mut self, hidden: Hidden) {
        self.hidden.push(hidden);
    }

    /// Hides `element` unless it is already hidden by this session.
    pub(crate) fn hide(&mut self, element: &Element) {
        if self.hidden.iter().any(|h| h.element == *element) {
            return;
        }
        self.hidden.push(Hidden::hide(element.clone()));
    }

    /// Replaces the clone with a plain clone of `animatable`, keeping its
    /// current rectangle.
    pub(crate) fn substitute(&mut self, animatable: &Element) -> Result<(), TransitionError> {
        let window = dom::window()?;
        let parts = clone::build(&window, animatable, false)?;
        dom::place(&parts.element, self.rect);
        if let Some(old) = &self.clone {
            old.replace_with_with_node_1(&parts.element)
                .map_err(TransitionError::dom)?;
        }
        self.clone = Some(parts.element);
        self.cropped_icon = false;
        Ok(())
    }

    /// Gives up before the swap: reports why and navigates to `url`.
    ///
    /// The overlay stays up; the navigation discards it with the page.
    pub(crate) fn abort(&mut self, url: &str, err: &TransitionError) {
        console::warn!("logo-explode:", err.to_string());
        self.advance(Phase::Aborted);
        fallback(&self.ctx, url, err);
    }

    /// Restores every hidden element and removes the overlay.
    ///
    /// Both happen in the same task, so no frame shows neither or both.
    pub(crate) fn teardown(&mut self) {
        for hidden in self.hidden.drain(..) {
            hidden.restore();
        }
        if let Some(overlay) = self.overlay.take() {
            overlay.remove();
        }
        self.clone = None;
        if self.ledger.visible() == Visible::Clone {
            self.ledger.hand_to_live();
        }
    }
}

/// Plain navigation to `url`, reported with the reason derived from `err`.
pub(crate) fn fallback(ctx: &EngineContext, url: &str, err: &TransitionError) {
    ctx.trace(|t| {
        t.fallback(&FallbackEvent {
            url,
            reason: err.fallback_reason(),
        });
    });
    ctx.navigator().navigate(url);
}
