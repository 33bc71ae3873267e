// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted menu-bar session against a console host.
//!
//! This example shows the full integration surface without any real toolkit:
//! - `canopy_host::Host` implemented by a logging simulator,
//! - `canopy_menu::MenuTree` driven by a fixed event script: open the File
//!   menu, rest on "Export As" until the hover intent fires, pick ".PDF",
//!   then swap to the Edit menu and dismiss everything with an outside click.
//!
//! Run:
//! - `cargo run -p canopy_demos --example menu_bar`

use std::collections::HashMap;

use canopy_host::{AnchorKind, Host, ItemWidgetKind, PanelStyle, Placement, TimerToken};
use canopy_menu::MenuTree;
use kurbo::{Point, Rect};

/// A host that draws nothing and narrates every call instead.
///
/// Geometry is synthesized: anchors sit in a 25px menu bar, panels stack
/// their items top to bottom at the style's item height, and global
/// rectangles are derived from wherever the core last placed each panel.
struct ConsoleHost {
    next: u32,
    names: HashMap<u32, String>,
    rects: HashMap<u32, Rect>,
    /// (panel, item) creation order, used to stack item rectangles.
    item_count: HashMap<u32, usize>,
    /// Item widget back to its panel, so items travel when a panel moves.
    parent: HashMap<u32, u32>,
    pointer: Point,
    under_pointer: Option<u32>,
    timers: Vec<(u64, TimerToken)>,
}

impl ConsoleHost {
    fn new() -> Self {
        Self {
            next: 100,
            names: HashMap::new(),
            rects: HashMap::new(),
            item_count: HashMap::new(),
            parent: HashMap::new(),
            pointer: Point::ZERO,
            under_pointer: None,
            timers: Vec::new(),
        }
    }

    fn add_anchor(&mut self, name: &str, index: usize) -> u32 {
        let w = self.fresh(name);
        let x = 50.0 * index as f64;
        self.rects.insert(w, Rect::new(x, 0.0, x + 50.0, 25.0));
        w
    }

    fn fresh(&mut self, name: &str) -> u32 {
        let w = self.next;
        self.next += 1;
        self.names.insert(w, name.to_string());
        w
    }

    fn name(&self, w: u32) -> &str {
        self.names.get(&w).map_or("?", String::as_str)
    }

    /// Move the simulated pointer over a widget.
    fn point_at(&mut self, w: u32) {
        if let Some(r) = self.rects.get(&w) {
            self.pointer = r.center();
        }
        self.under_pointer = Some(w);
    }

    /// Deliver every pending timer, oldest first.
    fn run_timers(&mut self, tree: &mut MenuTree<u32>) {
        while !self.timers.is_empty() {
            let batch: Vec<TimerToken> = self.timers.drain(..).map(|(_, t)| t).collect();
            for token in batch {
                println!("[host] timer fires: {token:?}");
                tree.on_timer(self, token);
            }
        }
    }
}

impl Host<u32> for ConsoleHost {
    fn create_panel(&mut self, style: &PanelStyle) -> u32 {
        let w = self.fresh("panel");
        self.item_count.insert(w, 0);
        self.rects
            .insert(w, Rect::new(0.0, 0.0, style.width, 0.0));
        println!("[host] create panel #{w}");
        w
    }

    fn create_item(&mut self, panel: u32, label: &str, kind: ItemWidgetKind) -> u32 {
        let w = self.fresh(label);
        let row = self.item_count.entry(panel).or_insert(0);
        let panel_rect = self.rects[&panel];
        let y = panel_rect.y0 + 25.0 * *row as f64;
        *row += 1;
        self.rects
            .insert(w, Rect::new(panel_rect.x0, y, panel_rect.x1, y + 25.0));
        let grown = Rect::new(panel_rect.x0, panel_rect.y0, panel_rect.x1, y + 25.0);
        self.rects.insert(panel, grown);
        self.parent.insert(w, panel);
        println!("[host] create {kind:?} {label:?} in panel #{panel}");
        w
    }

    fn destroy_widget(&mut self, w: u32) {
        println!("[host] destroy {:?} #{w}", self.name(w));
        self.names.remove(&w);
        self.rects.remove(&w);
        self.parent.remove(&w);
    }

    fn apply_style(&mut self, _w: u32, _style: &PanelStyle) {}

    fn rect_in_parent(&self, w: u32) -> Option<Rect> {
        self.rects.get(&w).copied()
    }

    fn rect_global(&self, w: u32) -> Option<Rect> {
        self.rects.get(&w).copied()
    }

    fn pointer_global(&self) -> Point {
        self.pointer
    }

    fn widget_under_pointer(&self) -> Option<u32> {
        self.under_pointer
    }

    fn place(&mut self, panel: u32, at: Placement<u32>) {
        // Keep the stored rectangle in sync so hit testing sees the move.
        let base = match at.relative_to.and_then(|p| self.rects.get(&p)) {
            Some(parent) => Point::new(parent.x0 + at.origin.x, parent.y0 + at.origin.y),
            None => at.origin,
        };
        let r = self.rects[&panel];
        let shift = kurbo::Vec2::new(base.x - r.x0, base.y - r.y0);
        self.rects.insert(panel, r + shift);
        let items: Vec<u32> = self
            .parent
            .iter()
            .filter(|(_, p)| **p == panel)
            .map(|(w, _)| *w)
            .collect();
        for item in items {
            if let Some(ir) = self.rects.get(&item).copied() {
                self.rects.insert(item, ir + shift);
            }
        }
        println!("[host] place panel #{panel} at ({:.1}, {:.1})", base.x, base.y);
    }

    fn unplace(&mut self, panel: u32) {
        println!("[host] unplace panel #{panel}");
    }

    fn raise(&mut self, panel: u32) {
        println!("[host] raise panel #{panel}");
    }

    fn focus(&mut self, panel: u32) {
        println!("[host] focus panel #{panel}");
    }

    fn schedule(&mut self, delay_ms: u64, token: TimerToken) {
        println!("[host] schedule {token:?} in {delay_ms}ms");
        self.timers.push((delay_ms, token));
    }

    fn cancel(&mut self, token: TimerToken) {
        println!("[host] cancel {token:?}");
        self.timers.retain(|(_, t)| *t != token);
    }
}

fn main() {
    let mut host = ConsoleHost::new();
    let mut tree = MenuTree::new();
    let window = host.fresh("window");

    // A three-entry menu bar.
    let file_anchor = host.add_anchor("File", 0);
    let edit_anchor = host.add_anchor("Edit", 1);
    let help_anchor = host.add_anchor("Help", 2);
    let style = PanelStyle::default();
    let file = tree
        .attach(&mut host, file_anchor, AnchorKind::RootMenuBar, window, style.clone())
        .expect("fresh anchor");
    let edit = tree
        .attach(&mut host, edit_anchor, AnchorKind::RootMenuBar, window, style.clone())
        .expect("fresh anchor");
    let _help = tree
        .attach(&mut host, help_anchor, AnchorKind::RootMenuBar, window, style)
        .expect("fresh anchor");

    tree.add_option_with(&mut host, file, "Open", Box::new(|| println!("  -> Open!")));
    tree.add_option_with(&mut host, file, "Save", Box::new(|| println!("  -> Save!")));
    tree.add_separator(&mut host, file);
    let export = tree.add_submenu(&mut host, file, "Export As").expect("live menu");
    tree.add_option_with(&mut host, export, ".TXT", Box::new(|| println!("  -> .TXT!")));
    tree.add_option_with(&mut host, export, ".PDF", Box::new(|| println!("  -> .PDF!")));
    tree.add_option(&mut host, edit, "Cut");
    tree.add_option(&mut host, edit, "Paste");

    let by_name = |host: &ConsoleHost, name: &str| {
        host.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(w, _)| *w)
            .expect("widget exists")
    };
    let trigger = by_name(&host, "Export As");
    let pdf = by_name(&host, ".PDF");

    println!("\n== click File ==");
    tree.on_activate(&mut host, file_anchor);

    println!("\n== rest on \"Export As\" ==");
    host.point_at(trigger);
    tree.on_pointer_enter(&mut host, trigger);
    host.run_timers(&mut tree);
    println!(
        "open: file={} export={}",
        tree.is_visible(file),
        tree.is_visible(export)
    );

    println!("\n== pick \".PDF\" ==");
    host.point_at(pdf);
    let press = host.pointer_global();
    tree.on_window_press(&mut host, window, press);
    tree.on_activate(&mut host, pdf);

    println!("\n== click Edit, then File: siblings swap ==");
    tree.on_activate(&mut host, edit_anchor);
    tree.on_activate(&mut host, file_anchor);
    println!(
        "open: file={} edit={}",
        tree.is_visible(file),
        tree.is_visible(edit)
    );

    println!("\n== click outside everything ==");
    tree.on_window_press(&mut host, window, Point::new(400.0, 300.0));
    println!("open: file={}", tree.is_visible(file));
}
