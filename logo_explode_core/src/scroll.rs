// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll position around a document swap.
//!
//! Browsers try to restore scroll positions on their own, which fights the
//! swap. The plan applies its target right after the new body is in place
//! and, when scroll forcing is enabled, once before the mutation and again at
//! each of [`CHECKPOINTS_MS`].

use alloc::string::String;
use alloc::vec::Vec;

/// Delays after the swap at which the scroll target is re-applied.
pub const CHECKPOINTS_MS: [u32; 2] = [50, 250];

/// Where the viewport should end up.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// The top of the document.
    Top,
    /// The element with this id, below any fixed site header.
    Fragment(String),
}

/// When and where to scroll for one swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollPlan {
    /// Destination of every scroll in this plan.
    pub target: ScrollTarget,
    /// Scroll to the top before mutating the document.
    pub before_swap: bool,
    /// Delays (ms after the swap) at which to re-apply the target.
    pub checkpoints: Vec<u32>,
}

impl ScrollPlan {
    /// Chooses the plan for a destination whose decoded fragment is
    /// `fragment`.
    ///
    /// `has_element` reports whether the destination document contains an
    /// element with the given id.
    #[must_use]
    pub fn choose(
        fragment: Option<&str>,
        force_top: bool,
        has_element: impl Fn(&str) -> bool,
    ) -> Self {
        let fragment = fragment.filter(|&id| has_element(id)).map(String::from);
        let checkpoints = if force_top {
            CHECKPOINTS_MS.to_vec()
        } else {
            Vec::new()
        };
        match fragment {
            Some(id) => Self {
                target: ScrollTarget::Fragment(id),
                before_swap: false,
                checkpoints,
            },
            None => Self {
                target: ScrollTarget::Top,
                before_swap: force_top,
                checkpoints,
            },
        }
    }
}

/// Returns the raw, still percent-encoded fragment of `url`, if it has a
/// non-empty one.
#[must_use]
pub fn fragment_of(url: &str) -> Option<&str> {
    let (_, raw) = url.split_once('#')?;
    (!raw.is_empty()).then_some(raw)
}

/// Document offset to scroll to so that an element whose viewport top is
/// `element_top` sits just below a fixed header of `header_height`.
#[must_use]
pub fn fragment_offset(element_top: f64, scroll_y: f64, header_height: f64) -> f64 {
    (element_top + scroll_y - header_height.max(0.0)).max(0.0)
}
