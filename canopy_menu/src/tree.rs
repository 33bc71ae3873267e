// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu tree storage and construction: the node arena, item lists, anchor
//! bindings, and the top-level sibling registries.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use canopy_host::{AnchorKind, Host, ItemWidgetKind, PanelStyle, TimerToken};
use hashbrown::HashMap;
use log::debug;
use smallvec::SmallVec;

use crate::types::{AttachError, HOVER_INTENT_DELAY_MS, MenuFlags, MenuId};

/// What a widget handle means to the tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Binding {
    /// A root anchor; activation toggles the menu.
    Anchor(MenuId),
    /// An item widget (option or submenu trigger) owned by the menu.
    Item(MenuId),
    /// A menu's own floating panel.
    Panel(MenuId),
}

/// The widget a node opens from and positions against.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum AnchorRef<W> {
    /// Root menu: an arbitrary clickable widget, classified at attach time.
    Widget { widget: W, kind: AnchorKind },
    /// Submenu: the owning trigger item inside `menu`. Non-owning
    /// back-reference, used for geometry and upward walks only.
    Trigger { menu: MenuId, widget: W },
}

/// A selectable leaf entry.
pub(crate) struct OptionItem<W> {
    pub(crate) label: String,
    pub(crate) widget: W,
    pub(crate) on_select: Option<Box<dyn FnMut()>>,
}

/// An entry owning exactly one child menu.
pub(crate) struct SubmenuItem<W> {
    pub(crate) label: String,
    pub(crate) widget: W,
    pub(crate) child: MenuId,
}

/// One entry of a menu, in display order.
pub(crate) enum Item<W> {
    Option(OptionItem<W>),
    Submenu(SubmenuItem<W>),
    Separator { widget: W },
}

impl<W> Item<W> {
    /// Label of an interactive item; separators have none.
    pub(crate) fn label(&self) -> Option<&str> {
        match self {
            Self::Option(o) => Some(&o.label),
            Self::Submenu(s) => Some(&s.label),
            Self::Separator { .. } => None,
        }
    }

    pub(crate) fn widget(&self) -> &W {
        match self {
            Self::Option(o) => &o.widget,
            Self::Submenu(s) => &s.widget,
            Self::Separator { widget } => widget,
        }
    }
}

/// Deferred hover intent for a submenu node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum HoverAction {
    /// Open the node if the pointer is still over its trigger.
    Open,
    /// Close the open submenus of the node's parent, unless vetoed.
    Close,
}

pub(crate) struct MenuNode<W> {
    pub(crate) generation: u32,
    pub(crate) items: Vec<Item<W>>,
    pub(crate) flags: MenuFlags,
    pub(crate) anchor: AnchorRef<W>,
    pub(crate) panel: W,
    /// Top-level window whose press dispatcher covers this node. Submenus
    /// inherit it from their root.
    pub(crate) window: W,
    pub(crate) style: PanelStyle,
    /// At most one live hover-intent timer per node.
    pub(crate) pending: Option<(TimerToken, HoverAction)>,
}

/// A forest of overlay menus sharing one arena, plus the widget bindings and
/// per-window top-level registries that tie them to the host toolkit.
///
/// Nodes are addressed by generational [`MenuId`]s; operations on stale ids
/// are silent no-ops. All mutation happens through methods that take the
/// [`Host`] so the tree can issue widget and timer calls as state changes.
///
/// Event flow: the host forwards raw input into the entry points
/// ([`MenuTree::on_activate`], [`MenuTree::on_pointer_enter`],
/// [`MenuTree::on_pointer_leave`], [`MenuTree::on_panel_enter`],
/// [`MenuTree::on_window_press`], [`MenuTree::on_timer`]) and the tree
/// decides what becomes visible.
pub struct MenuTree<W> {
    /// slots
    pub(crate) nodes: Vec<Option<MenuNode<W>>>,
    /// last generation per slot (persists across frees)
    pub(crate) generations: Vec<u32>,
    pub(crate) free_list: Vec<usize>,
    pub(crate) bindings: HashMap<W, Binding>,
    /// Live hover-intent tokens back to the submenu node they belong to.
    pub(crate) timers: HashMap<TimerToken, MenuId>,
    /// Registered top-level menus per window; opening one hides the others.
    pub(crate) registries: HashMap<W, SmallVec<[MenuId; 4]>>,
    next_token: u64,
    hover_delay_ms: u64,
}

impl<W> core::fmt::Debug for MenuTree<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("MenuTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("pending_timers", &self.timers.len())
            .field("hover_delay_ms", &self.hover_delay_ms)
            .finish_non_exhaustive()
    }
}

impl<W> Default for MenuTree<W> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            bindings: HashMap::new(),
            timers: HashMap::new(),
            registries: HashMap::new(),
            next_token: 0,
            hover_delay_ms: HOVER_INTENT_DELAY_MS,
        }
    }
}

impl<W: Copy + Eq + Hash + Debug> MenuTree<W> {
    /// Create an empty tree with the default hover-intent delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hover-intent debounce delay, milliseconds.
    pub fn hover_delay_ms(&self) -> u64 {
        self.hover_delay_ms
    }

    /// Set the hover-intent debounce delay. Applies to timers scheduled from
    /// now on; pending timers keep the delay they were scheduled with.
    pub fn set_hover_delay_ms(&mut self, delay_ms: u64) {
        self.hover_delay_ms = delay_ms;
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: MenuId) -> bool {
        self.get(id).is_some()
    }

    /// Whether a live node is currently on screen. Stale ids are hidden.
    pub fn is_visible(&self, id: MenuId) -> bool {
        self.get(id)
            .is_some_and(|n| n.flags.contains(MenuFlags::VISIBLE))
    }

    /// Whether a live node was created by [`MenuTree::add_submenu`].
    pub fn is_submenu(&self, id: MenuId) -> bool {
        self.get(id)
            .is_some_and(|n| n.flags.contains(MenuFlags::SUBMENU))
    }

    /// The menu owning `id`'s trigger, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: MenuId) -> Option<MenuId> {
        match self.get(id)?.anchor {
            AnchorRef::Trigger { menu, .. } => Some(menu),
            AnchorRef::Widget { .. } => None,
        }
    }

    /// Labels of the interactive items of `id`, in display order.
    /// Separators do not participate.
    pub fn item_labels(&self, id: MenuId) -> Vec<&str> {
        self.get(id)
            .map(|n| n.items.iter().filter_map(Item::label).collect())
            .unwrap_or_default()
    }

    /// The child menu created for the submenu item labelled `label`.
    pub fn submenu_id(&self, id: MenuId, label: &str) -> Option<MenuId> {
        self.get(id)?.items.iter().find_map(|it| match it {
            Item::Submenu(s) if s.label == label => Some(s.child),
            _ => None,
        })
    }

    /// The style carried by a live node.
    pub fn style(&self, id: MenuId) -> Option<&PanelStyle> {
        self.get(id).map(|n| &n.style)
    }

    /// Attach a new root menu to `anchor`.
    ///
    /// `kind` classifies the anchor's container explicitly; it decides
    /// whether the menu joins the per-`window` top-level registry (menu-bar
    /// and title-bar roots do, plain anchors do not). `window` is the
    /// top-level window whose press events the host forwards to
    /// [`MenuTree::on_window_press`] for outside-click dismissal.
    ///
    /// Fails fast on structural misuse; see [`AttachError`].
    pub fn attach<H: Host<W>>(
        &mut self,
        host: &mut H,
        anchor: W,
        kind: AnchorKind,
        window: W,
        style: PanelStyle,
    ) -> Result<MenuId, AttachError> {
        if self.bindings.contains_key(&anchor) {
            return Err(AttachError::AnchorInUse);
        }
        if kind == AnchorKind::RootTitleBar && !host.supports_title_menu() {
            return Err(AttachError::TitleMenuUnsupported);
        }
        let panel = host.create_panel(&style);
        let id = self.insert_node(|generation| MenuNode {
            generation,
            items: Vec::new(),
            flags: MenuFlags::empty(),
            anchor: AnchorRef::Widget {
                widget: anchor,
                kind,
            },
            panel,
            window,
            style,
            pending: None,
        });
        self.bindings.insert(anchor, Binding::Anchor(id));
        self.bindings.insert(panel, Binding::Panel(id));
        if kind != AnchorKind::PlainAnchor {
            self.registries.entry(window).or_default().push(id);
        }
        debug!("attached {id:?} to anchor {anchor:?} as {kind:?}");
        Ok(id)
    }

    /// Append an option item with no selection callback.
    ///
    /// Returns `false` if `menu` is stale.
    pub fn add_option<H: Host<W>>(&mut self, host: &mut H, menu: MenuId, label: &str) -> bool {
        self.push_option(host, menu, label, None)
    }

    /// Append an option item that runs `on_select` when chosen.
    ///
    /// The entire open path is hidden *before* the callback runs, so its side
    /// effects never race an open overlay.
    pub fn add_option_with<H: Host<W>>(
        &mut self,
        host: &mut H,
        menu: MenuId,
        label: &str,
        on_select: Box<dyn FnMut()>,
    ) -> bool {
        self.push_option(host, menu, label, Some(on_select))
    }

    fn push_option<H: Host<W>>(
        &mut self,
        host: &mut H,
        menu: MenuId,
        label: &str,
        on_select: Option<Box<dyn FnMut()>>,
    ) -> bool {
        let Some(node) = self.get(menu) else {
            return false;
        };
        let (panel, style) = (node.panel, node.style.clone());
        let widget = host.create_item(panel, label, ItemWidgetKind::Option);
        host.apply_style(widget, &style);
        self.bindings.insert(widget, Binding::Item(menu));
        if let Some(node) = self.get_mut(menu) {
            node.items.push(Item::Option(OptionItem {
                label: label.to_string(),
                widget,
                on_select,
            }));
        }
        true
    }

    /// Append a submenu trigger and construct its child menu, which inherits
    /// this node's style and window. Returns the child so items can be added
    /// to it, or `None` if `menu` is stale.
    pub fn add_submenu<H: Host<W>>(
        &mut self,
        host: &mut H,
        menu: MenuId,
        label: &str,
    ) -> Option<MenuId> {
        let node = self.get(menu)?;
        let (panel, window, style) = (node.panel, node.window, node.style.clone());
        let trigger = host.create_item(panel, label, ItemWidgetKind::Submenu);
        host.apply_style(trigger, &style);
        let child_panel = host.create_panel(&style);
        let child = self.insert_node(|generation| MenuNode {
            generation,
            items: Vec::new(),
            flags: MenuFlags::SUBMENU,
            anchor: AnchorRef::Trigger {
                menu,
                widget: trigger,
            },
            panel: child_panel,
            window,
            style,
            pending: None,
        });
        self.bindings.insert(trigger, Binding::Item(menu));
        self.bindings.insert(child_panel, Binding::Panel(child));
        if let Some(node) = self.get_mut(menu) {
            node.items.push(Item::Submenu(SubmenuItem {
                label: label.to_string(),
                widget: trigger,
                child,
            }));
        }
        debug!("added submenu {child:?} ({label:?}) under {menu:?}");
        Some(child)
    }

    /// Append a non-interactive divider. Purely cosmetic.
    pub fn add_separator<H: Host<W>>(&mut self, host: &mut H, menu: MenuId) -> bool {
        let Some(node) = self.get(menu) else {
            return false;
        };
        let panel = node.panel;
        let widget = host.create_item(panel, "", ItemWidgetKind::Separator);
        if let Some(node) = self.get_mut(menu) {
            node.items.push(Item::Separator { widget });
        }
        true
    }

    /// Remove the first item labelled `label`.
    ///
    /// A submenu match destroys its child subtree depth-first before the
    /// trigger goes away. Returns whether a match was found; an unknown
    /// label is a no-op, not an error.
    pub fn remove_option<H: Host<W>>(&mut self, host: &mut H, menu: MenuId, label: &str) -> bool {
        let Some(node) = self.get(menu) else {
            return false;
        };
        let Some(idx) = node.items.iter().position(|it| it.label() == Some(label)) else {
            return false;
        };
        let item = match self.get_mut(menu) {
            Some(node) => node.items.remove(idx),
            None => return false,
        };
        match item {
            Item::Option(o) => {
                self.bindings.remove(&o.widget);
                host.destroy_widget(o.widget);
            }
            Item::Submenu(s) => {
                self.destroy_node(host, s.child);
                self.bindings.remove(&s.widget);
                host.destroy_widget(s.widget);
            }
            Item::Separator { .. } => {}
        }
        true
    }

    /// Hide the node, destroy every descendant submenu and every item widget,
    /// and clear the item list. The panel itself survives and can be
    /// repopulated.
    pub fn clean<H: Host<W>>(&mut self, host: &mut H, menu: MenuId) {
        if !self.is_alive(menu) {
            return;
        }
        self.hide_subtree(host, menu);
        let items = match self.get_mut(menu) {
            Some(node) => core::mem::take(&mut node.items),
            None => return,
        };
        for item in items {
            match item {
                Item::Option(o) => {
                    self.bindings.remove(&o.widget);
                    host.destroy_widget(o.widget);
                }
                Item::Submenu(s) => {
                    self.destroy_node(host, s.child);
                    self.bindings.remove(&s.widget);
                    host.destroy_widget(s.widget);
                }
                Item::Separator { widget } => host.destroy_widget(widget),
            }
        }
    }

    /// Destroy a root menu entirely: subtree, panel, registry entry, anchor
    /// binding. Returns `false` for submenus (remove them through their
    /// parent's [`MenuTree::remove_option`]) and stale ids.
    pub fn detach<H: Host<W>>(&mut self, host: &mut H, menu: MenuId) -> bool {
        match self.get(menu) {
            Some(node) if matches!(node.anchor, AnchorRef::Widget { .. }) => {
                self.hide_subtree(host, menu);
                self.destroy_node(host, menu);
                true
            }
            _ => false,
        }
    }

    /// Replace the style of `menu` and re-apply it to the panel, its item
    /// widgets, and every descendant submenu (which inherit it).
    pub fn restyle<H: Host<W>>(&mut self, host: &mut H, menu: MenuId, style: PanelStyle) {
        let Some(node) = self.get_mut(menu) else {
            return;
        };
        node.style = style.clone();
        let panel = node.panel;
        let widgets: Vec<W> = node.items.iter().map(|it| *it.widget()).collect();
        let children = self.child_submenus(menu);
        host.apply_style(panel, &style);
        for w in widgets {
            host.apply_style(w, &style);
        }
        for child in children {
            self.restyle(host, child, style.clone());
        }
    }

    /// Primary activation (click) of a bound widget.
    ///
    /// Anchors and submenu triggers toggle their menu. Option items close
    /// the whole open path first, then run their callback. Unknown or stale
    /// widgets are ignored.
    pub fn on_activate<H: Host<W>>(&mut self, host: &mut H, w: W) {
        match self.bindings.get(&w).copied() {
            Some(Binding::Anchor(menu)) => self.toggle_show(host, menu),
            Some(Binding::Item(menu)) => {
                let Some(idx) = self.item_index_by_widget(menu, w) else {
                    return;
                };
                enum Act {
                    Toggle(MenuId),
                    Select(usize),
                }
                let act = match self.get(menu).map(|n| &n.items[idx]) {
                    Some(Item::Submenu(s)) => Act::Toggle(s.child),
                    Some(Item::Option(_)) => Act::Select(idx),
                    _ => return,
                };
                match act {
                    Act::Toggle(child) => self.toggle_show(host, child),
                    Act::Select(idx) => {
                        debug!("option selected in {menu:?}; collapsing open path");
                        self.hide_all(host, menu);
                        if let Some(node) = self.get_mut(menu)
                            && let Some(Item::Option(o)) = node.items.get_mut(idx)
                            && let Some(cb) = o.on_select.as_mut()
                        {
                            cb();
                        }
                    }
                }
            }
            Some(Binding::Panel(_)) | None => {}
        }
    }

    // --- internal plumbing -------------------------------------------------

    pub(crate) fn get(&self, id: MenuId) -> Option<&MenuNode<W>> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    pub(crate) fn get_mut(&mut self, id: MenuId) -> Option<&mut MenuNode<W>> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.1)
    }

    fn insert_node(&mut self, mk: impl FnOnce(u32) -> MenuNode<W>) -> MenuId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(mk(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(mk(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "MenuId uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        MenuId::new(idx, generation)
    }

    /// Destroy `id` and its whole subtree: timers cancelled, bindings
    /// dropped, panels destroyed, registry entries removed, slots freed.
    pub(crate) fn destroy_node<H: Host<W>>(&mut self, host: &mut H, id: MenuId) {
        let (items, pending, panel, anchor, window) = match self.get_mut(id) {
            Some(node) => (
                core::mem::take(&mut node.items),
                node.pending.take(),
                node.panel,
                node.anchor,
                node.window,
            ),
            None => return,
        };
        if let Some((token, _)) = pending {
            host.cancel(token);
            self.timers.remove(&token);
        }
        for item in items {
            match item {
                Item::Option(o) => {
                    self.bindings.remove(&o.widget);
                }
                Item::Submenu(s) => {
                    self.bindings.remove(&s.widget);
                    self.destroy_node(host, s.child);
                }
                Item::Separator { .. } => {}
            }
        }
        self.bindings.remove(&panel);
        if let AnchorRef::Widget { widget, kind } = anchor {
            self.bindings.remove(&widget);
            if kind != AnchorKind::PlainAnchor
                && let Some(roots) = self.registries.get_mut(&window)
            {
                roots.retain(|r| *r != id);
                if roots.is_empty() {
                    self.registries.remove(&window);
                }
            }
        }
        host.destroy_widget(panel);
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        debug!("destroyed {id:?}");
    }

    pub(crate) fn child_submenus(&self, id: MenuId) -> Vec<MenuId> {
        self.get(id)
            .map(|n| {
                n.items
                    .iter()
                    .filter_map(|it| match it {
                        Item::Submenu(s) => Some(s.child),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn item_index_by_widget(&self, menu: MenuId, w: W) -> Option<usize> {
        self.get(menu)?.items.iter().position(|it| *it.widget() == w)
    }

    pub(crate) fn alloc_token(&mut self) -> TimerToken {
        self.next_token += 1;
        TimerToken(self.next_token)
    }
}
