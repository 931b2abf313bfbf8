// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Head reconciliation.
//!
//! When a destination page is swapped in, its `<head>` is not replaced;
//! instead its assets are merged into the current head so the overlay never
//! loses its styles and already-loaded scripts do not run twice:
//!
//! - stylesheet `<link>`s are appended unless one with the same URL exists,
//! - inline `<style id=…>` blocks replace the block with the same id, or are
//!   appended when new (id-less blocks are left alone),
//! - external `<script src=…>` tags are appended unless one with the same URL
//!   exists.
//!
//! URLs are compared as given, so callers should resolve them to absolute
//! form first.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

/// Asset identities found in one `<head>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadEntries {
    /// Absolute URLs of `<link rel="stylesheet">` elements.
    pub stylesheets: Vec<String>,
    /// Ids of inline `<style>` elements that have one.
    pub styles: Vec<String>,
    /// Absolute URLs of external `<script>` elements.
    pub scripts: Vec<String>,
}

/// What to do with one incoming inline style block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAction {
    /// Replace the existing block with the same id by incoming block `n`.
    Replace(usize),
    /// Append incoming block `n`.
    Append(usize),
}

/// Indices into the incoming [`HeadEntries`] describing what to merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadPlan {
    /// Incoming stylesheets to append.
    pub stylesheets: Vec<usize>,
    /// Incoming inline styles to replace or append.
    pub styles: Vec<StyleAction>,
    /// Incoming scripts to append.
    pub scripts: Vec<usize>,
}

impl HeadPlan {
    /// Plans the merge of `incoming` into a head that currently holds
    /// `existing`.
    #[must_use]
    pub fn reconcile(existing: &HeadEntries, incoming: &HeadEntries) -> Self {
        let styles = {
            let present: BTreeSet<&str> = existing.styles.iter().map(String::as_str).collect();
            let mut seen = BTreeSet::new();
            incoming
                .styles
                .iter()
                .enumerate()
                .filter(|(_, id)| seen.insert(id.as_str()))
                .map(|(n, id)| {
                    if present.contains(id.as_str()) {
                        StyleAction::Replace(n)
                    } else {
                        StyleAction::Append(n)
                    }
                })
                .collect()
        };
        Self {
            stylesheets: missing(&existing.stylesheets, &incoming.stylesheets),
            styles,
            scripts: missing(&existing.scripts, &incoming.scripts),
        }
    }

    /// Returns `true` when nothing needs to change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty() && self.styles.is_empty() && self.scripts.is_empty()
    }
}

/// Indices of `incoming` URLs not in `existing`, first occurrence only.
fn missing(existing: &[String], incoming: &[String]) -> Vec<usize> {
    let mut present: BTreeSet<&str> = existing.iter().map(String::as_str).collect();
    incoming
        .iter()
        .enumerate()
        .filter(|(_, url)| !url.is_empty() && present.insert(url.as_str()))
        .map(|(n, _)| n)
        .collect()
}
