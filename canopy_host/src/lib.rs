// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Host: the interface an embedding toolkit implements for Canopy menus.
//!
//! Canopy keeps all menu *logic* (the visibility state machine, hover-intent
//! debouncing, hit testing) in [`canopy_menu`], and pushes everything physical
//! — widget creation, painting, event loops, timers — behind the [`Host`]
//! trait in this crate. The embedding toolkit implements [`Host`] once and
//! forwards its raw input events into the core's entry points.
//!
//! The split follows a simple contract:
//!
//! - The core never touches pixels. It asks the host to create panels and item
//!   widgets, to place/unplace floating panels at explicit coordinates, and to
//!   raise and focus them.
//! - The host never decides visibility. It delivers clicks, pointer
//!   enter/leave crossings, window-level presses, and timer expirations to the
//!   core, which replies with host calls.
//! - All calls happen on the single UI thread; deferred work exists only as
//!   cancellable [`TimerToken`] timers scheduled through the host.
//!
//! Geometry uses [`kurbo`] types. Queries return *physical* pixels in either
//! parent-relative or root/global coordinates; [`Host::scale_factor`] lets the
//! core divide physical coordinates back into the logical space used for
//! placement.
//!
//! Stale widgets are a normal condition, not an error: every geometry query
//! returns an `Option`, and a destroyed widget simply stops being found.
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! [`canopy_menu`]: https://docs.rs/canopy_menu

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect};

/// Identifier for a pending cooperative timer.
///
/// Tokens are allocated by the core, never reused, and compared structurally.
/// The host maps a token onto whatever its own deferred-call handle is and
/// reports expiry back with the same token.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// How the container of a menu's trigger widget is classified.
///
/// The kind is decided by the caller once, at attach time, and determines
/// which top-level sibling registry (if any) the menu joins so that opening
/// one top-level menu can close unrelated ones.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AnchorKind {
    /// The trigger sits in a conventional in-window menu bar.
    RootMenuBar,
    /// The trigger sits in a title-bar overlay window.
    ///
    /// Title-bar menus are a platform feature; hosts report availability via
    /// [`Host::supports_title_menu`].
    RootTitleBar,
    /// Any other clickable widget. The menu gets no sibling registry.
    PlainAnchor,
}

/// The visual role of an item widget inside a menu panel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ItemWidgetKind {
    /// A selectable leaf entry.
    Option,
    /// An entry that expands into a child menu.
    Submenu,
    /// A non-interactive divider line.
    Separator,
}

/// Where to put a floating panel, in logical pixels.
///
/// ```
/// use canopy_host::Placement;
/// use kurbo::Point;
///
/// // A root menu placed in window space:
/// let at: Placement<u32> = Placement::window(Point::new(8.0, 30.0));
/// assert!(at.relative_to.is_none());
///
/// // A submenu placed in its parent panel's space:
/// let at = Placement::in_parent(7_u32, Point::new(152.0, 20.0));
/// assert_eq!(at.relative_to, Some(7));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement<W> {
    /// Panel whose coordinate space `origin` is expressed in, or `None` for
    /// the window space the panel was created in.
    pub relative_to: Option<W>,
    /// Top-left corner of the panel, logical pixels.
    pub origin: Point,
}

impl<W> Placement<W> {
    /// Placement in window space.
    pub const fn window(origin: Point) -> Self {
        Self {
            relative_to: None,
            origin,
        }
    }

    /// Placement relative to another panel.
    pub const fn in_parent(parent: W, origin: Point) -> Self {
        Self {
            relative_to: Some(parent),
            origin,
        }
    }
}

/// An sRGB color with alpha. Styling is opaque to the core; this is only a
/// carrier type the host interprets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    /// Fully transparent. Hosts should skip painting transparent fills.
    pub const TRANSPARENT: Self = Self(0, 0, 0, 0);

    /// Opaque color from red/green/blue components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b, 0xFF)
    }
}

/// A font request. Purely advisory; the host resolves it however it likes.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name, e.g. `"helvetica"`.
    pub family: Cow<'static, str>,
    /// Size in logical pixels.
    pub size: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: Cow::Borrowed("helvetica"),
            size: 12.0,
        }
    }
}

/// Visual configuration for a menu panel and its item widgets.
///
/// Every recognized option is an explicit field; there is no dynamic keyword
/// dispatch. The core carries the style, inherits it into submenus, and hands
/// it back to the host on creation and restyling — it never interprets it.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelStyle {
    /// Panel and item width, logical pixels.
    pub width: f64,
    /// Height of one item row, logical pixels.
    pub item_height: f64,
    /// Horizontal placement offset from the anchor.
    pub padx: f64,
    /// Vertical placement offset from the anchor.
    pub pady: f64,
    /// Panel corner radius.
    pub corner_radius: f64,
    /// Panel border width.
    pub border_width: f64,
    /// Panel background fill.
    pub bg: Rgba,
    /// Item fill when idle.
    pub fg: Rgba,
    /// Item text color.
    pub text: Rgba,
    /// Item fill while hovered.
    pub hover: Rgba,
    /// Panel border color.
    pub border: Rgba,
    /// Separator line color.
    pub separator: Rgba,
    /// Item label font.
    pub font: FontSpec,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            width: 150.0,
            item_height: 25.0,
            padx: 3.0,
            pady: 3.0,
            corner_radius: 10.0,
            border_width: 1.0,
            bg: Rgba::TRANSPARENT,
            fg: Rgba::TRANSPARENT,
            text: Rgba::rgb(0xEE, 0xEE, 0xEE),
            hover: Rgba::rgb(0x40, 0x40, 0x40),
            border: Rgba::rgb(0x7F, 0x7F, 0x7F),
            separator: Rgba::rgb(0x33, 0x33, 0x33),
            font: FontSpec::default(),
        }
    }
}

/// Everything the menu core consumes from the embedding toolkit.
///
/// `W` is the host's widget handle: any small copyable id (`u32`, a
/// generational id, a pointer-sized key). The core stores and compares
/// handles; it never inspects them.
///
/// ## Event delivery
///
/// This trait is the *outbound* half of the integration. For the inbound
/// half, the host binds its own primary-activation, pointer-crossing,
/// window-press, and timer events, and forwards them into the core
/// (`MenuTree::on_activate`, `on_pointer_enter`/`on_pointer_leave`,
/// `on_panel_enter`, `on_window_press`, `on_timer` in `canopy_menu`). All
/// delivery is synchronous on the UI thread.
///
/// ## Widget identity under the pointer
///
/// [`Host::widget_under_pointer`] must report the *logical* widget: if a
/// button is internally composed of a canvas and a text label, hovering
/// either part reports the button's handle.
pub trait Host<W: Copy + Eq + Hash + Debug> {
    /// Create a floating menu panel, initially unplaced (not on screen).
    fn create_panel(&mut self, style: &PanelStyle) -> W;

    /// Create an item widget inside `panel`, appended below existing items.
    fn create_item(&mut self, panel: W, label: &str, kind: ItemWidgetKind) -> W;

    /// Destroy a widget. Destroying a panel destroys its item widgets.
    /// Idempotent; destroying an unknown handle is a no-op.
    fn destroy_widget(&mut self, w: W);

    /// Re-apply visual configuration to an existing panel or item widget.
    fn apply_style(&mut self, w: W, style: &PanelStyle);

    /// Bounding rectangle of `w` relative to its parent widget, physical
    /// pixels. `None` if the widget no longer exists.
    fn rect_in_parent(&self, w: W) -> Option<Rect>;

    /// Bounding rectangle of `w` in root/global coordinates, physical pixels.
    /// `None` if the widget no longer exists.
    fn rect_global(&self, w: W) -> Option<Rect>;

    /// Physical pixels per logical pixel for the display the menus live on.
    fn scale_factor(&self) -> f64 {
        1.0
    }

    /// Current pointer position in root/global coordinates, physical pixels.
    fn pointer_global(&self) -> Point;

    /// The logical widget currently under the pointer, if any.
    fn widget_under_pointer(&self) -> Option<W>;

    /// Put `panel` on screen at the given placement.
    fn place(&mut self, panel: W, at: Placement<W>);

    /// Take `panel` off screen. Pure geometry removal; the widget persists.
    fn unplace(&mut self, panel: W);

    /// Raise `panel` above its siblings.
    fn raise(&mut self, panel: W);

    /// Give `panel` input focus.
    fn focus(&mut self, panel: W);

    /// Schedule `token` to fire after `delay_ms` on a future loop tick.
    fn schedule(&mut self, delay_ms: u64, token: TimerToken);

    /// Cancel a pending timer. Idempotent; unknown tokens are ignored.
    fn cancel(&mut self, token: TimerToken);

    /// Whether this host can attach menus into the window title bar.
    fn supports_title_menu(&self) -> bool {
        false
    }
}
