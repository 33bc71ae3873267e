// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Menu: a deterministic, `no_std` state machine for cascading
//! dropdown menus.
//!
//! ## Overview
//!
//! This crate owns the logical side of an overlay menu system: the tree of
//! menus and their items, which panels are open, pending hover intents, and
//! what a press anywhere in the window means for the open path. It draws
//! nothing and listens to nothing. A toolkit adapter implements
//! [`Host`](canopy_host::Host) — widget creation, geometry queries, placement,
//! timers — and forwards its native events into the entry points here.
//!
//! ## Workflow
//!
//! 1) Attach — [`MenuTree::attach`] binds a menu to an anchor widget and asks
//!    the host for a floating panel. Menu-bar and title-bar anchors join a
//!    per-window registry so sibling roots close each other.
//! 2) Populate — [`MenuTree::add_option`], [`MenuTree::add_submenu`], and
//!    [`MenuTree::add_separator`] grow the tree. Submenus own their child
//!    menus; removing a trigger destroys the subtree under it.
//! 3) Forward events — the host calls [`MenuTree::on_activate`] for clicks on
//!    anchors and items, [`MenuTree::on_pointer_enter`] /
//!    [`MenuTree::on_pointer_leave`] for hover, [`MenuTree::on_panel_enter`]
//!    when the pointer crosses into a panel, [`MenuTree::on_window_press`]
//!    for every press in the window, and [`MenuTree::on_timer`] when a
//!    scheduled token fires.
//!
//! ## Hover intent
//!
//! Submenus open and close on a debounce rather than on raw crossing events.
//! Resting on a trigger for [`HOVER_INTENT_DELAY_MS`] opens its child; the
//! open re-validates that the pointer is still on the trigger. Leaving arms a
//! close that the pointer can veto once by re-entering the menu's territory
//! before the timer fires.
//!
//! ## Dismissal
//!
//! A press outside a menu's own panel, its ancestor chain, and its open
//! descendants collapses that menu's whole open path. Containment uses
//! half-open rectangles in global coordinates, so adjacent panels never both
//! claim a boundary point.
//!
//! ```
//! use canopy_host::{AnchorKind, Host, ItemWidgetKind, PanelStyle, Placement, TimerToken};
//! use canopy_menu::MenuTree;
//! use kurbo::{Point, Rect};
//!
//! struct Headless(u32);
//!
//! impl Host<u32> for Headless {
//!     fn create_panel(&mut self, _style: &PanelStyle) -> u32 {
//!         self.0 += 1;
//!         self.0
//!     }
//!     fn create_item(&mut self, _panel: u32, _label: &str, _kind: ItemWidgetKind) -> u32 {
//!         self.0 += 1;
//!         self.0
//!     }
//!     fn rect_in_parent(&self, _w: u32) -> Option<Rect> {
//!         Some(Rect::new(0.0, 0.0, 100.0, 25.0))
//!     }
//!     fn rect_global(&self, _w: u32) -> Option<Rect> {
//!         Some(Rect::new(0.0, 0.0, 100.0, 25.0))
//!     }
//!     fn pointer_global(&self) -> Point {
//!         Point::ZERO
//!     }
//!     fn widget_under_pointer(&self) -> Option<u32> {
//!         None
//!     }
//!     # fn destroy_widget(&mut self, _w: u32) {}
//!     # fn apply_style(&mut self, _w: u32, _style: &PanelStyle) {}
//!     # fn place(&mut self, _panel: u32, _at: Placement<u32>) {}
//!     # fn unplace(&mut self, _panel: u32) {}
//!     # fn raise(&mut self, _panel: u32) {}
//!     # fn focus(&mut self, _panel: u32) {}
//!     # fn schedule(&mut self, _delay_ms: u64, _token: TimerToken) {}
//!     # fn cancel(&mut self, _token: TimerToken) {}
//! }
//!
//! let mut host = Headless(100);
//! let mut tree = MenuTree::new();
//! let anchor = 1;
//! let file = tree
//!     .attach(&mut host, anchor, AnchorKind::RootMenuBar, 0, PanelStyle::default())
//!     .unwrap();
//! tree.add_option(&mut host, file, "Open");
//! tree.add_option(&mut host, file, "Save");
//!
//! tree.on_activate(&mut host, anchor);
//! assert!(tree.is_visible(file));
//! tree.on_activate(&mut host, anchor);
//! assert!(!tree.is_visible(file));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hit;
mod hover;
mod tree;
mod types;
mod visibility;

#[cfg(test)]
mod test_host;

pub use hit::point_in_rect;
pub use tree::MenuTree;
pub use types::{AttachError, HOVER_INTENT_DELAY_MS, MenuFlags, MenuId};
