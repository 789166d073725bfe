//! Navbar chrome: mobile menu toggle and scroll-driven appearance.

use shared::protocol::Target;
use tracing::debug;

use crate::{config::NavbarConfig, surface::Surface};

const ACTIVE: &str = "active";

pub fn close_menu(surface: &mut dyn Surface) {
    surface.remove_class(&Target::NavMenu, ACTIVE);
    surface.remove_class(&Target::NavToggle, ACTIVE);
}

pub struct NavChrome {
    breakpoint_px: f64,
    navbar: NavbarConfig,
    last_scroll_top: f64,
}

impl NavChrome {
    pub fn new(breakpoint_px: f64, navbar: NavbarConfig) -> Self {
        Self {
            breakpoint_px,
            navbar,
            last_scroll_top: 0.0,
        }
    }

    pub fn toggle_menu(&mut self, surface: &mut dyn Surface) {
        let open = !surface.has_class(&Target::NavMenu, ACTIVE);
        surface.set_class(&Target::NavMenu, ACTIVE, open);
        surface.set_class(&Target::NavToggle, ACTIVE, open);
        debug!(open, "nav: menu toggled");
    }

    pub fn document_click(&mut self, inside_nav: bool, surface: &mut dyn Surface) {
        if !inside_nav {
            close_menu(surface);
        }
    }

    pub fn resize(&mut self, width: f64, surface: &mut dyn Surface) {
        if width > self.breakpoint_px {
            close_menu(surface);
        }
    }

    /// Hides the navbar while scrolling down past the hide offset and shows it
    /// again on any upward scroll.
    pub fn scroll(&mut self, top: f64, surface: &mut dyn Surface) {
        let transform = if top > self.last_scroll_top && top > self.navbar.hide_after_px {
            "translateY(-100%)"
        } else {
            "translateY(0)"
        };
        surface.set_style(&Target::Navbar, "transform", transform);
        self.last_scroll_top = top;

        let background = if top > self.navbar.solid_after_px {
            &self.navbar.solid_background
        } else {
            &self.navbar.translucent_background
        };
        surface.set_style(&Target::Navbar, "background", background);
    }
}
