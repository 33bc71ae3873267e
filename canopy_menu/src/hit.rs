// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and the window-level press dispatcher.
//!
//! The dispatcher is bound once per top-level window by the host and runs on
//! every press. Containment works on root/global coordinates so it stays
//! valid across independently floating panels, and every rectangle query
//! tolerates widgets that were destroyed between scheduling and delivery.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use canopy_host::Host;
use kurbo::{Point, Rect};
use log::debug;

use crate::tree::MenuTree;
use crate::types::MenuId;

/// Half-open containment check.
///
/// Left and top edges are inside; right and bottom edges are outside, so two
/// panels sharing an edge never both claim the same point.
///
/// Point and rectangle must share one coordinate space. The press dispatcher
/// uses root/global *physical* pixels on both sides, straight from
/// [`Host::rect_global`] — no scale-factor conversion is involved, unlike the
/// logical-pixel [`Placement`](canopy_host::Placement) origins.
///
/// ```
/// use canopy_menu::point_in_rect;
/// use kurbo::{Point, Rect};
///
/// let r = Rect::new(10.0, 10.0, 20.0, 20.0);
/// assert!(point_in_rect(Point::new(10.0, 10.0), r));
/// assert!(!point_in_rect(Point::new(20.0, 10.0), r));
/// assert!(!point_in_rect(Point::new(10.0, 20.0), r));
/// ```
pub fn point_in_rect(p: Point, r: Rect) -> bool {
    p.x >= r.x0 && p.x < r.x1 && p.y >= r.y0 && p.y < r.y1
}

impl<W: Copy + Eq + Hash + Debug> MenuTree<W> {
    /// A press happened anywhere in `window`, at `point` in root/global
    /// *physical* pixels — the same space [`Host::rect_global`] reports in.
    /// Hosts must not pre-divide the point by the scale factor.
    ///
    /// Every visible node attached to the window checks whether the point
    /// lies inside its own panel, inside any panel on its owning-ancestor
    /// chain, or inside any currently open descendant submenu. A node whose
    /// interactive region the press misses entirely collapses its whole open
    /// path. Nodes whose widgets are already gone count as invisible.
    pub fn on_window_press<H: Host<W>>(&mut self, host: &mut H, window: W, point: Point) {
        let ids: Vec<MenuId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let node = slot.as_ref()?;
                if node.window != window {
                    return None;
                }
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "MenuId uses 32-bit indices by design."
                )]
                let idx = idx as u32;
                Some(MenuId::new(idx, node.generation))
            })
            .collect();
        for id in ids {
            // Re-check liveness and visibility: an earlier collapse in this
            // very loop may already have hidden the node.
            if !self.is_visible(id) {
                continue;
            }
            // A panel the host can no longer measure counts as not visible;
            // the check degrades to a no-op rather than collapsing the path.
            if self
                .get(id)
                .and_then(|n| host.rect_global(n.panel))
                .is_none()
            {
                continue;
            }
            if self.press_engages(host, id, point) {
                continue;
            }
            debug!("press at {point:?} outside the open path of {id:?}");
            self.hide_all(host, id);
        }
    }

    /// Whether the point keeps `id` engaged: inside the node itself, its
    /// owning-ancestor chain, or any open descendant submenu.
    fn press_engages<H: Host<W>>(&self, host: &H, id: MenuId, point: Point) -> bool {
        if self.panel_contains(host, id, point) {
            return true;
        }
        let mut cur = self.parent_of(id);
        while let Some(parent) = cur {
            if self.panel_contains(host, parent, point) {
                return true;
            }
            cur = self.parent_of(parent);
        }
        self.open_descendant_contains(host, id, point)
    }

    fn panel_contains<H: Host<W>>(&self, host: &H, id: MenuId, point: Point) -> bool {
        self.get(id)
            .and_then(|n| host.rect_global(n.panel))
            .is_some_and(|r| point_in_rect(point, r))
    }

    fn open_descendant_contains<H: Host<W>>(&self, host: &H, id: MenuId, point: Point) -> bool {
        self.child_submenus(id).into_iter().any(|child| {
            self.is_visible(child)
                && (self.panel_contains(host, child, point)
                    || self.open_descendant_contains(host, child, point))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::TestHost;
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use canopy_host::{AnchorKind, PanelStyle};
    use core::cell::Cell;

    const FILE_ANCHOR: u32 = 1;
    const EDIT_ANCHOR: u32 = 2;
    const WINDOW: u32 = 10;

    const FILE_PANEL_RECT: Rect = Rect::new(0.0, 25.0, 150.0, 125.0);
    const EXPORT_PANEL_RECT: Rect = Rect::new(150.0, 60.0, 300.0, 120.0);

    struct Scene {
        tree: MenuTree<u32>,
        file: MenuId,
        edit: MenuId,
        export: MenuId,
        export_trigger: u32,
        pdf_option: u32,
        pdf_fired: Rc<Cell<bool>>,
    }

    /// The classic menu bar: File = [Open, Save, ───, Export As ▸ [.TXT,
    /// .PDF]], Edit = [Cut]. Panels get fixed global rectangles.
    fn scene(host: &mut TestHost) -> Scene {
        let mut tree = MenuTree::new();
        host.add_widget(FILE_ANCHOR, Rect::new(0.0, 0.0, 50.0, 25.0));
        host.add_widget(EDIT_ANCHOR, Rect::new(50.0, 0.0, 100.0, 25.0));
        let file = tree
            .attach(
                host,
                FILE_ANCHOR,
                AnchorKind::RootMenuBar,
                WINDOW,
                PanelStyle::default(),
            )
            .expect("attach file");
        let edit = tree
            .attach(
                host,
                EDIT_ANCHOR,
                AnchorKind::RootMenuBar,
                WINDOW,
                PanelStyle::default(),
            )
            .expect("attach edit");
        tree.add_option(host, file, "Open");
        tree.add_option(host, file, "Save");
        tree.add_separator(host, file);
        let export = tree.add_submenu(host, file, "Export As").expect("submenu");
        tree.add_option(host, export, ".TXT");
        let pdf_fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&pdf_fired);
        tree.add_option_with(host, export, ".PDF", Box::new(move || flag.set(true)));
        tree.add_option(host, edit, "Cut");

        let widget = |label: &str| {
            host.created_items
                .iter()
                .find(|(_, _, l, _)| l == label)
                .map(|(w, ..)| *w)
                .expect("item widget")
        };
        let export_trigger = widget("Export As");
        let pdf_option = widget(".PDF");

        let file_panel = host.panels[0];
        let export_panel = host.panels[2];
        host.set_rects(file_panel, FILE_PANEL_RECT, FILE_PANEL_RECT);
        host.set_rects(export_panel, EXPORT_PANEL_RECT, EXPORT_PANEL_RECT);

        Scene {
            tree,
            file,
            edit,
            export,
            export_trigger,
            pdf_option,
            pdf_fired,
        }
    }

    fn fire_all(tree: &mut MenuTree<u32>, host: &mut TestHost) {
        for token in host.take_timers() {
            tree.on_timer(host, token);
        }
    }

    #[test]
    fn boundary_points_follow_the_half_open_interval() {
        let r = Rect::new(0.0, 25.0, 150.0, 125.0);
        assert!(point_in_rect(Point::new(0.0, 25.0), r));
        assert!(point_in_rect(Point::new(149.999, 124.999), r));
        assert!(!point_in_rect(Point::new(150.0, 25.0), r));
        assert!(!point_in_rect(Point::new(0.0, 125.0), r));
        assert!(!point_in_rect(Point::new(-0.001, 25.0), r));
    }

    #[test]
    fn press_inside_the_panel_keeps_it_open() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);
        sc.tree.toggle_show(&mut host, sc.file);

        sc.tree
            .on_window_press(&mut host, WINDOW, Point::new(10.0, 50.0));
        assert!(sc.tree.is_visible(sc.file));
    }

    #[test]
    fn press_outside_everything_collapses_the_open_path() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);
        sc.tree.toggle_show(&mut host, sc.file);
        sc.tree.show(&mut host, sc.export);

        sc.tree
            .on_window_press(&mut host, WINDOW, Point::new(400.0, 400.0));

        assert!(!sc.tree.is_visible(sc.file));
        assert!(!sc.tree.is_visible(sc.export));
    }

    #[test]
    fn press_inside_an_open_descendant_keeps_the_ancestors() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);
        sc.tree.toggle_show(&mut host, sc.file);
        sc.tree.show(&mut host, sc.export);

        // Inside the export panel, outside the file panel.
        sc.tree
            .on_window_press(&mut host, WINDOW, Point::new(200.0, 80.0));

        assert!(sc.tree.is_visible(sc.file));
        assert!(sc.tree.is_visible(sc.export));
    }

    #[test]
    fn press_inside_an_ancestor_keeps_the_submenu_engaged() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);
        sc.tree.toggle_show(&mut host, sc.file);
        sc.tree.show(&mut host, sc.export);

        // Inside the file panel only; the submenu's chain check passes.
        sc.tree
            .on_window_press(&mut host, WINDOW, Point::new(10.0, 50.0));

        assert!(sc.tree.is_visible(sc.export));
    }

    #[test]
    fn presses_in_other_windows_are_ignored() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);
        sc.tree.toggle_show(&mut host, sc.file);

        sc.tree
            .on_window_press(&mut host, 99, Point::new(400.0, 400.0));
        assert!(sc.tree.is_visible(sc.file));
    }

    #[test]
    fn destroyed_panels_fail_the_check_silently() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);
        sc.tree.toggle_show(&mut host, sc.file);

        // Simulate the host tearing the panel down behind our back.
        let file_panel = host.panels[0];
        host.rect_global.remove(&file_panel);

        // Even a press far outside everything skips the unmeasurable node
        // instead of collapsing its path.
        sc.tree
            .on_window_press(&mut host, WINDOW, Point::new(400.0, 400.0));
        assert!(
            sc.tree.is_visible(sc.file),
            "unmeasurable node must be skipped, not collapsed"
        );
    }

    #[test]
    fn export_to_pdf_scenario_closes_the_whole_bar() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);

        // Click "File" in the menu bar.
        sc.tree.on_activate(&mut host, FILE_ANCHOR);
        assert!(sc.tree.is_visible(sc.file));

        // Hover "Export As" long enough for the debounce to fire.
        sc.tree.on_pointer_enter(&mut host, sc.export_trigger);
        host.under_pointer = Some(sc.export_trigger);
        fire_all(&mut sc.tree, &mut host);
        assert!(sc.tree.is_visible(sc.export));

        // Click ".PDF": the press lands inside the export panel (no
        // collapse), then activation selects the option.
        sc.tree
            .on_window_press(&mut host, WINDOW, Point::new(200.0, 100.0));
        sc.tree.on_activate(&mut host, sc.pdf_option);

        assert!(sc.pdf_fired.get());
        assert!(!sc.tree.is_visible(sc.file));
        assert!(!sc.tree.is_visible(sc.export));
        assert!(!sc.tree.is_visible(sc.edit));
    }

    #[test]
    fn opening_edit_while_file_is_open_swaps_them() {
        let mut host = TestHost::new();
        let mut sc = scene(&mut host);

        sc.tree.on_activate(&mut host, FILE_ANCHOR);
        assert!(sc.tree.is_visible(sc.file));

        sc.tree.on_activate(&mut host, EDIT_ANCHOR);
        assert!(!sc.tree.is_visible(sc.file));
        assert!(sc.tree.is_visible(sc.edit));
    }
}
