// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover-intent debouncing for submenu triggers.
//!
//! Pointer crossings never open or close a submenu directly. Entering a
//! trigger schedules an open intent, leaving it schedules a close intent, and
//! either one cancels whatever was pending for that child first — at most one
//! timer is ever live per node, so expirations cannot reorder. When an intent
//! finally fires it re-checks the world: an open validates the pointer is
//! still physically over the trigger, a close honors the parent's one-shot
//! `HOVERED` veto set by re-entry into an adjacent item or the child panel.

use core::fmt::Debug;
use core::hash::Hash;

use canopy_host::{Host, TimerToken};
use log::trace;

use crate::tree::{AnchorRef, HoverAction, Item, MenuTree};
use crate::types::{MenuFlags, MenuId};

impl<W: Copy + Eq + Hash + Debug> MenuTree<W> {
    /// Pointer entered an item widget.
    ///
    /// Collapses the sibling submenus of the item's menu immediately, marks
    /// the menu as re-engaged when it is itself a submenu (feeding the close
    /// veto), and schedules an open intent when the item is a trigger.
    pub fn on_pointer_enter<H: Host<W>>(&mut self, host: &mut H, w: W) {
        let Some(crate::tree::Binding::Item(menu)) = self.bindings.get(&w).copied() else {
            return;
        };
        let Some(idx) = self.item_index_by_widget(menu, w) else {
            return;
        };
        self.collapse_siblings(host, menu, w);
        let kind = match self.get(menu).and_then(|n| n.items.get(idx)) {
            Some(Item::Option(_)) => None,
            Some(Item::Submenu(s)) => Some(s.child),
            _ => return,
        };
        match kind {
            Some(child) => self.schedule_intent(host, child, HoverAction::Open),
            None => {
                if let Some(node) = self.get_mut(menu)
                    && node.flags.contains(MenuFlags::SUBMENU)
                {
                    node.flags.insert(MenuFlags::HOVERED);
                }
            }
        }
    }

    /// Pointer left an item widget. Triggers schedule a close intent for
    /// their child; other items are ignored.
    pub fn on_pointer_leave<H: Host<W>>(&mut self, host: &mut H, w: W) {
        let Some(crate::tree::Binding::Item(menu)) = self.bindings.get(&w).copied() else {
            return;
        };
        let Some(idx) = self.item_index_by_widget(menu, w) else {
            return;
        };
        if let Some(Item::Submenu(s)) = self.get(menu).and_then(|n| n.items.get(idx)) {
            let child = s.child;
            // Only re-engagement *after* the close is armed may veto it.
            if let Some(node) = self.get_mut(menu) {
                node.flags.remove(MenuFlags::HOVERED);
            }
            self.schedule_intent(host, child, HoverAction::Close);
        }
    }

    /// Pointer entered a submenu's panel: mark the *parent* menu re-engaged
    /// so a close scheduled by leaving the trigger is vetoed once.
    pub fn on_panel_enter<H: Host<W>>(&mut self, _host: &mut H, w: W) {
        let Some(crate::tree::Binding::Panel(menu)) = self.bindings.get(&w).copied() else {
            return;
        };
        let Some(parent) = self.parent_of(menu) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.flags.insert(MenuFlags::HOVERED);
        }
    }

    /// A scheduled hover-intent timer fired.
    ///
    /// Unknown tokens — cancelled, superseded, or belonging to a node that
    /// has since been destroyed — are silent no-ops.
    pub fn on_timer<H: Host<W>>(&mut self, host: &mut H, token: TimerToken) {
        let Some(child) = self.timers.remove(&token) else {
            return;
        };
        let action = match self.get_mut(child) {
            Some(node) => match node.pending.take() {
                Some((pending, action)) if pending == token => action,
                other => {
                    // Raced a reschedule; keep the newer intent armed.
                    node.pending = other;
                    return;
                }
            },
            None => return,
        };
        trace!("hover intent {action:?} fired for {child:?}");
        match action {
            HoverAction::Open => self.fire_open(host, child),
            HoverAction::Close => self.fire_close(host, child),
        }
    }

    /// Cancel whatever intent is pending for `child` and arm a new one.
    pub(crate) fn schedule_intent<H: Host<W>>(
        &mut self,
        host: &mut H,
        child: MenuId,
        action: HoverAction,
    ) {
        let Some(previous) = self.get_mut(child).map(|n| n.pending.take()) else {
            return;
        };
        if let Some((token, _)) = previous {
            host.cancel(token);
            self.timers.remove(&token);
        }
        let token = self.alloc_token();
        self.timers.insert(token, child);
        if let Some(node) = self.get_mut(child) {
            node.pending = Some((token, action));
        }
        host.schedule(self.hover_delay_ms(), token);
        trace!("armed {action:?} for {child:?} as {token:?}");
    }

    fn fire_open<H: Host<W>>(&mut self, host: &mut H, child: MenuId) {
        if self.is_visible(child) {
            return;
        }
        let Some(AnchorRef::Trigger {
            menu: parent,
            widget: trigger,
        }) = self.get(child).map(|n| n.anchor)
        else {
            return;
        };
        for sibling in self.child_submenus(parent) {
            self.hide_subtree(host, sibling);
        }
        // A fast sweep may have left the trigger before the delay elapsed.
        if host.widget_under_pointer() != Some(trigger) {
            trace!("open intent for {child:?} dropped; pointer moved on");
            return;
        }
        self.show(host, child);
    }

    fn fire_close<H: Host<W>>(&mut self, host: &mut H, child: MenuId) {
        let Some(parent) = self.parent_of(child) else {
            return;
        };
        if let Some(node) = self.get_mut(parent)
            && node.flags.contains(MenuFlags::HOVERED)
        {
            // One-shot veto: the pointer re-engaged since the close was
            // scheduled. Consume the flag and keep everything open.
            node.flags.remove(MenuFlags::HOVERED);
            return;
        }
        for sibling in self.child_submenus(parent) {
            self.hide_subtree(host, sibling);
        }
    }
}
