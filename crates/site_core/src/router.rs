use std::time::Duration;

use shared::{
    domain::PageId,
    error::{Outcome, SkipReason},
    protocol::{ScrollBehavior, Target, Timer},
};
use tracing::{debug, info};

use crate::{nav::close_menu, surface::Surface};

const ACTIVE: &str = "active";

/// Page visibility, nav-link markers, URL fragment and scroll reset.
pub struct PageRouter {
    pages: Vec<PageId>,
    home: PageId,
    breakpoint_px: f64,
    home_recheck: Duration,
}

impl PageRouter {
    /// A `home` the markup lacks is replaced by the first page.
    pub fn new(pages: Vec<PageId>, home: PageId, breakpoint_px: f64, home_recheck: Duration) -> Self {
        let home = match pages.first() {
            Some(first) if !pages.contains(&home) => first.clone(),
            _ => home,
        };
        Self {
            pages,
            home,
            breakpoint_px,
            home_recheck,
        }
    }

    pub fn home(&self) -> &PageId {
        &self.home
    }

    pub fn knows(&self, page: &PageId) -> bool {
        self.pages.contains(page)
    }

    /// Shows `page` and hides every other one. Unknown ids change nothing.
    pub fn show_page(&mut self, page: &PageId, surface: &mut dyn Surface) -> Outcome<PageId> {
        if !self.knows(page) {
            debug!(page = %page, "router: unknown page ignored");
            return Outcome::Skipped(SkipReason::MissingTarget);
        }

        for other in &self.pages {
            surface.remove_class(&Target::Page(other.clone()), ACTIVE);
        }
        surface.add_class(&Target::Page(page.clone()), ACTIVE);

        for other in &self.pages {
            surface.remove_class(&Target::NavLink(other.clone()), ACTIVE);
        }
        surface.add_class(&Target::NavLink(page.clone()), ACTIVE);

        if surface.viewport_width() <= self.breakpoint_px {
            close_menu(surface);
        }

        if page == &self.home {
            surface.scroll_to_top(ScrollBehavior::Instant);
            surface.schedule(self.home_recheck, Timer::HomeScrollRecheck);
        } else {
            surface.scroll_to_top(ScrollBehavior::Smooth);
        }

        info!("router: showing page={page}");
        Outcome::Applied(page.clone())
    }

    /// Nav-control activation: show the page and record it in history.
    pub fn navigate(&mut self, page: &PageId, surface: &mut dyn Surface) -> Outcome<PageId> {
        let outcome = self.show_page(page, surface);
        if outcome.is_applied() {
            surface.push_fragment(page.as_str());
        }
        outcome
    }

    /// Back/forward or initial load: the fragment's page, or home when the
    /// fragment is absent or unknown.
    pub fn restore(&mut self, fragment: Option<&str>, surface: &mut dyn Surface) -> Outcome<PageId> {
        let page = fragment
            .and_then(PageId::from_fragment)
            .filter(|page| self.knows(page))
            .unwrap_or_else(|| self.home.clone());
        self.show_page(&page, surface)
    }
}
