// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-node visibility state machine.
//!
//! Each node is either Hidden or Visible; the operations here move single
//! nodes, subtrees, and whole open paths between the two while keeping the
//! visible set a single contiguous path: no node is ever left on screen under
//! a hidden parent. Public one-level operations ([`MenuTree::hide_children`])
//! keep their narrow contract; every internal collapse path works on full
//! subtrees.

use core::fmt::Debug;
use core::hash::Hash;

use canopy_host::{AnchorKind, Host, Placement};
use kurbo::Point;
use log::{debug, trace};

use crate::tree::{AnchorRef, MenuTree};
use crate::types::{MenuFlags, MenuId};

impl<W: Copy + Eq + Hash + Debug> MenuTree<W> {
    /// Place the node on screen, raise it above siblings, and focus it.
    ///
    /// A root node goes just below its anchor widget; a submenu goes to the
    /// right of its owning trigger, in the parent panel's coordinate space so
    /// it tracks a repositioned parent. Offsets are computed in logical
    /// pixels: physical host coordinates are divided by the scale factor
    /// first. If the anchor widget no longer exists the node stays hidden.
    pub fn show<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (panel, anchor) = (node.panel, node.anchor);
        let (padx, pady) = (node.style.padx, node.style.pady);
        let scale = host.scale_factor();
        let placement = match anchor {
            AnchorRef::Trigger { menu, widget } => {
                let Some(parent_panel) = self.get(menu).map(|p| p.panel) else {
                    return;
                };
                let Some(r) = host.rect_in_parent(widget) else {
                    return;
                };
                Placement::in_parent(
                    parent_panel,
                    Point::new(r.x1 / scale + padx, r.y0 / scale - pady),
                )
            }
            AnchorRef::Widget { widget, .. } => {
                let Some(r) = host.rect_in_parent(widget) else {
                    return;
                };
                Placement::window(Point::new(r.x0 / scale + padx, r.y1 / scale + pady))
            }
        };
        host.place(panel, placement);
        host.raise(panel);
        host.focus(panel);
        if let Some(node) = self.get_mut(id) {
            node.flags.insert(MenuFlags::VISIBLE);
        }
        trace!("show {id:?} at {placement:?}");
    }

    /// Take the node off screen. Pure geometry removal; the node persists.
    pub fn hide<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let panel = node.panel;
        node.flags.remove(MenuFlags::VISIBLE);
        host.unplace(panel);
        trace!("hide {id:?}");
    }

    /// Hide the child menu of every submenu trigger of `id`. One level only.
    pub fn hide_children<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        for child in self.child_submenus(id) {
            self.hide(host, child);
        }
    }

    /// Hide the whole owning chain above a submenu, up to its root.
    pub fn hide_parents<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        let mut cur = self.parent_of(id);
        while let Some(parent) = cur {
            self.hide(host, parent);
            cur = self.parent_of(parent);
        }
    }

    /// Hide every node on the open path through `id`: all descendants, the
    /// node itself, and its ancestors. This is the single operation used when
    /// an option is selected or a press lands outside the whole tree.
    pub fn hide_all<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        debug!("hide_all from {id:?}");
        self.hide_descendants(host, id);
        self.hide(host, id);
        self.hide_parents(host, id);
    }

    /// Toggle the node.
    ///
    /// A registered top-level menu (menu-bar or title-bar root) first hides
    /// every *other* registered top-level subtree of its window. Then: Hidden
    /// shows; Visible collapses the node's open descendants and hides it —
    /// toggling an open menu never re-shows it.
    pub fn toggle_show<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let window = node.window;
        let registered = matches!(
            node.anchor,
            AnchorRef::Widget {
                kind: AnchorKind::RootMenuBar | AnchorKind::RootTitleBar,
                ..
            }
        );
        if registered {
            let others: alloc::vec::Vec<MenuId> = self
                .registries
                .get(&window)
                .map(|roots| roots.iter().copied().filter(|m| *m != id).collect())
                .unwrap_or_default();
            for other in others {
                self.hide_subtree(host, other);
            }
        }
        if self.is_visible(id) {
            self.hide_descendants(host, id);
            self.hide(host, id);
        } else {
            self.show(host, id);
        }
    }

    /// Hide the expanded child subtree of every sibling submenu trigger other
    /// than the one owning `except`. Guarantees at most one sibling submenu
    /// is expanded at a time.
    pub(crate) fn collapse_siblings<H: Host<W>>(&mut self, host: &mut H, id: MenuId, except: W) {
        let Some(node) = self.get(id) else {
            return;
        };
        let others: alloc::vec::Vec<MenuId> = node
            .items
            .iter()
            .filter_map(|it| match it {
                crate::tree::Item::Submenu(s) if s.widget != except => Some(s.child),
                _ => None,
            })
            .collect();
        for child in others {
            self.hide_subtree(host, child);
        }
    }

    /// Hide every expanded child subtree of `id`, recursively.
    pub(crate) fn hide_descendants<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        for child in self.child_submenus(id) {
            self.hide_subtree(host, child);
        }
    }

    /// Hide `id` and everything below it.
    pub(crate) fn hide_subtree<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        self.hide_descendants(host, id);
        self.hide(host, id);
    }
}
