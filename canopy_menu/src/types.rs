// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the menu tree: node identifiers, state flags, errors.

/// Default hover-intent debounce delay, milliseconds.
///
/// Applies uniformly to submenu open intent and close intent. Tunable per
/// tree via [`MenuTree::set_hover_delay_ms`](crate::MenuTree::set_hover_delay_ms).
pub const HOVER_INTENT_DELAY_MS: u64 = 500;

/// Identifier for a menu node (generational).
///
/// Ids of destroyed nodes go stale rather than dangling: every lookup checks
/// the generation, so operations addressed to a node that no longer exists
/// degrade to no-ops. Timer expirations and window-press dispatch may
/// legitimately race node teardown, and must not fault when they lose.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MenuId(pub(crate) u32, pub(crate) u32);

impl MenuId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MenuFlags: u8 {
        /// Node is currently placed on screen.
        const VISIBLE = 0b0000_0001;
        /// One-shot close-veto flag: the pointer re-engaged with this node
        /// after a close intent was scheduled. Read and cleared exactly once
        /// when the close fires.
        const HOVERED = 0b0000_0010;
        /// Node is owned by a submenu trigger (not a root menu).
        const SUBMENU = 0b0000_0100;
    }
}

/// Structural misuse reported by [`MenuTree::attach`](crate::MenuTree::attach).
///
/// These indicate programmer error at construction time, not a runtime race,
/// and are surfaced immediately instead of being recovered from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AttachError {
    /// The anchor widget already toggles another menu.
    AnchorInUse,
    /// The anchor was classified [`RootTitleBar`](canopy_host::AnchorKind::RootTitleBar)
    /// but the host reports no title-menu support on this platform.
    TitleMenuUnsupported,
}

impl core::fmt::Display for AttachError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AnchorInUse => write!(f, "anchor widget already toggles a menu"),
            Self::TitleMenuUnsupported => {
                write!(f, "host does not support title-bar menus on this platform")
            }
        }
    }
}

impl core::error::Error for AttachError {}
