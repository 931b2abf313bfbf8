// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform-independent model for shared-element page transitions.
//!
//! `logo_explode_core` holds everything about a transition that can be
//! decided without touching a live document: configuration, the declarative
//! marker contract, geometry math, the session phase machine, and the plans
//! the document swapper follows. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! A transition is driven by a browser backend that measures and mutates the
//! DOM, consulting this crate at each step:
//!
//! ```text
//!   click on source marker
//!       │
//!       ▼
//!   TransitionMarker::read() ──► MarkerOverrides::resolve(&EngineConfig)
//!       │
//!       ▼
//!   VisualBox::resolve() ──► explode_rect() ──► PhaseMachine::advance()
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   HeadPlan::reconcile() + ScrollPlan ──► swap ──► HookRegistry
//!                 │
//!                 ▼
//!   VisualBox::resolve() (target) ──► SessionLedger::hand_to_live()
//! ```
//!
//! **[`config`]**: Engine configuration with lenient settings coercion.
//!
//! **[`marker`]**: `data-transition-*` attribute contract and per-marker
//! overrides.
//!
//! **[`geometry`]**: Visually-tight rectangles for vector and raster
//! content, viewBox cropping, and letterboxing.
//!
//! **[`session`]**: Phase machine and clone/live visibility ledger.
//!
//! **[`head`]**: Head reconciliation plan for stylesheets, styles, and
//! scripts.
//!
//! **[`scroll`]**: Scroll target selection after a swap.
//!
//! **[`hooks`]**: Registry of post-swap enhancement hooks.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! transition instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod geometry;
pub mod head;
pub mod hooks;
pub mod marker;
pub mod scroll;
pub mod session;
pub mod trace;
