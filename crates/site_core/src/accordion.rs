use std::time::Duration;

use shared::{
    domain::PageId,
    error::{Outcome, SkipReason},
    protocol::{Key, Section, Target},
};
use tracing::debug;

use crate::{
    bus::{PageAware, PageChange},
    surface::{css_delay, cycle_next, cycle_prev, ObserveOptions, Surface},
};

const ACTIVE: &str = "active";
const ANIMATE_IN: &str = "animate-in";

/// "Under construction" listing: at most one item expanded, first item open
/// by default.
pub struct AccordionGroup {
    page: PageId,
    items: usize,
    expanded: Option<usize>,
    entered: bool,
    page_active: bool,
    stagger: Duration,
}

impl AccordionGroup {
    pub fn new(
        page: PageId,
        items: usize,
        stagger: Duration,
        observe: ObserveOptions,
        surface: &mut dyn Surface,
    ) -> Self {
        let mut group = Self {
            page,
            items,
            expanded: None,
            entered: false,
            page_active: false,
            stagger,
        };

        for i in 0..items {
            let header = Target::ConstructionHeader(i);
            surface.set_attribute(&header, "tabindex", "0");
            surface.set_attribute(&header, "role", "button");
            let open = surface.has_class(&Target::ConstructionItem(i), ACTIVE);
            if open && group.expanded.is_none() {
                group.expanded = Some(i);
                surface.set_attribute(&header, "aria-expanded", "true");
            } else {
                group.collapse(i, surface);
            }
        }

        if group.expanded.is_none() && items > 0 {
            group.expand(0, surface);
        }

        if surface.exists(&Target::ConstructionSection) {
            surface.observe(Section::Construction, &Target::ConstructionSection, observe);
        }
        group
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Collapses an open item; otherwise closes the open sibling first and
    /// then opens `index`. Returns the item left expanded.
    pub fn toggle(&mut self, index: usize, surface: &mut dyn Surface) -> Outcome<Option<usize>> {
        if index >= self.items {
            return Outcome::Skipped(SkipReason::MissingTarget);
        }
        if self.expanded == Some(index) {
            self.collapse(index, surface);
        } else {
            if let Some(open) = self.expanded {
                self.collapse(open, surface);
            }
            self.expand(index, surface);
        }
        debug!(index, expanded = ?self.expanded, "accordion: toggled");
        Outcome::Applied(self.expanded)
    }

    pub fn header_key(&mut self, index: usize, key: Key, surface: &mut dyn Surface) -> bool {
        if !key.is_activation() {
            return false;
        }
        self.toggle(index, surface);
        true
    }

    /// ArrowUp/ArrowDown move focus between headers; expansion is untouched.
    pub fn on_key(&mut self, key: Key, surface: &mut dyn Surface) -> bool {
        if !self.page_active || self.items == 0 {
            return false;
        }
        let focused = match surface.focused() {
            Some(Target::ConstructionHeader(i)) if i < self.items => Some(i),
            _ => None,
        };
        let next = match key {
            Key::ArrowDown => cycle_next(focused, self.items),
            Key::ArrowUp => cycle_prev(focused, self.items),
            _ => return false,
        };
        surface.focus(&Target::ConstructionHeader(next));
        true
    }

    pub fn intersected(&mut self, surface: &mut dyn Surface) -> Outcome<()> {
        if self.entered {
            return Outcome::Skipped(SkipReason::RedundantAction);
        }
        self.entered = true;
        for i in 0..self.items {
            let item = Target::ConstructionItem(i);
            surface.set_style(&item, "animation-delay", &css_delay(self.stagger * i as u32));
            surface.add_class(&item, ANIMATE_IN);
        }
        surface.unobserve(Section::Construction);
        Outcome::Applied(())
    }

    fn expand(&mut self, index: usize, surface: &mut dyn Surface) {
        surface.add_class(&Target::ConstructionItem(index), ACTIVE);
        surface.set_attribute(&Target::ConstructionHeader(index), "aria-expanded", "true");
        self.expanded = Some(index);
    }

    fn collapse(&mut self, index: usize, surface: &mut dyn Surface) {
        surface.remove_class(&Target::ConstructionItem(index), ACTIVE);
        surface.set_attribute(&Target::ConstructionHeader(index), "aria-expanded", "false");
        if self.expanded == Some(index) {
            self.expanded = None;
        }
    }
}

impl PageAware for AccordionGroup {
    fn owning_page(&self) -> &PageId {
        &self.page
    }

    fn on_page_change(&mut self, change: &PageChange, _surface: &mut dyn Surface) {
        self.page_active = change.current == self.page;
    }
}
