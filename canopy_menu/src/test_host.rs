// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted [`Host`] used by the unit tests.
//!
//! Widgets are plain `u32` handles. Geometry is whatever the test says it is:
//! every created widget gets a placeholder rectangle so placement never
//! aborts, and tests that care about coordinates override rectangles through
//! [`TestHost::set_rects`]. Timers queue up instead of firing; tests drain
//! them with [`TestHost::take_timers`] and feed the tokens back into the tree.

use alloc::string::String;
use alloc::string::ToString;
use alloc::vec::Vec;

use canopy_host::{Host, ItemWidgetKind, PanelStyle, Placement, TimerToken};
use hashbrown::HashMap;
use kurbo::{Point, Rect};

pub(crate) struct TestHost {
    next: u32,
    pub(crate) rect_parent: HashMap<u32, Rect>,
    pub(crate) rect_global: HashMap<u32, Rect>,
    pub(crate) placed: HashMap<u32, Placement<u32>>,
    pub(crate) raised: Vec<u32>,
    pub(crate) focused: Vec<u32>,
    pub(crate) destroyed: Vec<u32>,
    /// (widget, panel, label, kind) per created item widget.
    pub(crate) created_items: Vec<(u32, u32, String, ItemWidgetKind)>,
    pub(crate) panels: Vec<u32>,
    pub(crate) styled: Vec<u32>,
    pub(crate) scheduled: Vec<(u64, TimerToken)>,
    pub(crate) cancelled: Vec<TimerToken>,
    pub(crate) pointer: Point,
    pub(crate) under_pointer: Option<u32>,
    pub(crate) scale: f64,
    pub(crate) title_menu: bool,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self {
            // Host-created widgets start at 100; tests use low ids for
            // anchors and windows they own.
            next: 100,
            rect_parent: HashMap::new(),
            rect_global: HashMap::new(),
            placed: HashMap::new(),
            raised: Vec::new(),
            focused: Vec::new(),
            destroyed: Vec::new(),
            created_items: Vec::new(),
            panels: Vec::new(),
            styled: Vec::new(),
            scheduled: Vec::new(),
            cancelled: Vec::new(),
            pointer: Point::ZERO,
            under_pointer: None,
            scale: 1.0,
            title_menu: false,
        }
    }

    /// Register an externally owned widget (anchor, window) with a rectangle
    /// used for both parent-relative and global queries.
    pub(crate) fn add_widget(&mut self, w: u32, rect: Rect) {
        self.rect_parent.insert(w, rect);
        self.rect_global.insert(w, rect);
    }

    /// Override both rectangles of an existing widget.
    pub(crate) fn set_rects(&mut self, w: u32, parent: Rect, global: Rect) {
        self.rect_parent.insert(w, parent);
        self.rect_global.insert(w, global);
    }

    /// Drain the pending timer queue, oldest first.
    pub(crate) fn take_timers(&mut self) -> Vec<TimerToken> {
        self.scheduled.drain(..).map(|(_, t)| t).collect()
    }

    fn fresh(&mut self) -> u32 {
        let w = self.next;
        self.next += 1;
        w
    }
}

impl Host<u32> for TestHost {
    fn create_panel(&mut self, _style: &PanelStyle) -> u32 {
        let w = self.fresh();
        self.panels.push(w);
        self.rect_parent.insert(w, Rect::new(0.0, 0.0, 150.0, 100.0));
        self.rect_global.insert(w, Rect::new(0.0, 0.0, 150.0, 100.0));
        w
    }

    fn create_item(&mut self, panel: u32, label: &str, kind: ItemWidgetKind) -> u32 {
        let w = self.fresh();
        self.created_items.push((w, panel, label.to_string(), kind));
        self.rect_parent.insert(w, Rect::new(0.0, 0.0, 150.0, 25.0));
        self.rect_global.insert(w, Rect::new(0.0, 0.0, 150.0, 25.0));
        w
    }

    fn destroy_widget(&mut self, w: u32) {
        self.destroyed.push(w);
        self.rect_parent.remove(&w);
        self.rect_global.remove(&w);
        self.placed.remove(&w);
    }

    fn apply_style(&mut self, w: u32, _style: &PanelStyle) {
        self.styled.push(w);
    }

    fn rect_in_parent(&self, w: u32) -> Option<Rect> {
        self.rect_parent.get(&w).copied()
    }

    fn rect_global(&self, w: u32) -> Option<Rect> {
        self.rect_global.get(&w).copied()
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }

    fn pointer_global(&self) -> Point {
        self.pointer
    }

    fn widget_under_pointer(&self) -> Option<u32> {
        self.under_pointer
    }

    fn place(&mut self, panel: u32, at: Placement<u32>) {
        self.placed.insert(panel, at);
    }

    fn unplace(&mut self, panel: u32) {
        self.placed.remove(&panel);
    }

    fn raise(&mut self, panel: u32) {
        self.raised.push(panel);
    }

    fn focus(&mut self, panel: u32) {
        self.focused.push(panel);
    }

    fn schedule(&mut self, delay_ms: u64, token: TimerToken) {
        self.scheduled.push((delay_ms, token));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.cancelled.push(token);
        self.scheduled.retain(|(_, t)| *t != token);
    }

    fn supports_title_menu(&self) -> bool {
        self.title_menu
    }
}
