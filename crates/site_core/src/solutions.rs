//! Problem/solution switcher with a non-overlapping cross-fade.

use std::time::Duration;

use shared::{
    domain::{PageId, SolutionId},
    error::{Outcome, SkipReason},
    protocol::{Key, Target, Timer},
};
use tracing::debug;

use crate::{
    bus::{PageAware, PageChange},
    surface::{cycle_next, cycle_prev, Surface},
};

const ACTIVE: &str = "active";
const COLLAPSED: &str = "collapsed";

pub struct SolutionSwitcher {
    page: PageId,
    ids: Vec<SolutionId>,
    /// Trigger currently marked active.
    selected: Option<SolutionId>,
    /// Panel currently laid out (`display: block`).
    shown: Option<SolutionId>,
    /// Panel waiting to be laid out or faded in.
    pending: Option<SolutionId>,
    generation: u64,
    page_active: bool,
    fade_out: Duration,
    fade_in: Duration,
}

impl SolutionSwitcher {
    /// Adopts whatever trigger/panel the markup already marks active.
    pub fn new(
        page: PageId,
        ids: Vec<SolutionId>,
        fade_out: Duration,
        fade_in: Duration,
        surface: &dyn Surface,
    ) -> Self {
        let selected = ids
            .iter()
            .find(|id| surface.has_class(&Target::ProblemCard((*id).clone()), ACTIVE))
            .cloned();
        let shown = ids
            .iter()
            .find(|id| surface.has_class(&Target::SolutionPanel((*id).clone()), ACTIVE))
            .cloned();
        Self {
            page,
            ids,
            selected,
            shown,
            pending: None,
            generation: 0,
            page_active: false,
            fade_out,
            fade_in,
        }
    }

    pub fn selected(&self) -> Option<&SolutionId> {
        self.selected.as_ref()
    }

    pub fn shown(&self) -> Option<&SolutionId> {
        self.shown.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn select(&mut self, id: &SolutionId, surface: &mut dyn Surface) -> Outcome<SolutionId> {
        if !self.ids.contains(id) {
            return Outcome::Skipped(SkipReason::MissingTarget);
        }
        if self.selected.as_ref() == Some(id) {
            return Outcome::Skipped(SkipReason::RedundantAction);
        }

        for other in &self.ids {
            let card = Target::ProblemCard(other.clone());
            let is_target = other == id;
            surface.set_class(&card, ACTIVE, is_target);
            surface.set_class(&card, COLLAPSED, !is_target);
        }
        self.selected = Some(id.clone());

        // Continuations from an interrupted handoff carry an older generation
        // and are dropped when they fire.
        self.generation += 1;
        self.pending = Some(id.clone());
        let generation = self.generation;

        match self.shown.clone() {
            Some(current) if &current == id => {
                surface.schedule(self.fade_in, Timer::SolutionReveal { generation });
            }
            Some(current) => {
                let panel = Target::SolutionPanel(current);
                surface.set_style(&panel, "opacity", "0");
                surface.set_style(&panel, "transform", "translateY(20px)");
                surface.after_transition(&panel, self.fade_out, Timer::SolutionHide { generation });
            }
            None => {
                self.lay_out(id, surface);
                surface.schedule(self.fade_in, Timer::SolutionReveal { generation });
            }
        }

        debug!(solution = %id, generation, "solutions: selected");
        Outcome::Applied(id.clone())
    }

    pub fn on_timer(&mut self, timer: &Timer, surface: &mut dyn Surface) {
        match *timer {
            Timer::SolutionHide { generation } if generation == self.generation => {
                if let Some(outgoing) = self.shown.take() {
                    let panel = Target::SolutionPanel(outgoing);
                    surface.remove_class(&panel, ACTIVE);
                    surface.set_style(&panel, "display", "none");
                }
                if let Some(incoming) = self.pending.clone() {
                    self.lay_out(&incoming, surface);
                    surface.schedule(self.fade_in, Timer::SolutionReveal { generation });
                }
            }
            Timer::SolutionReveal { generation } if generation == self.generation => {
                if let Some(incoming) = self.pending.take() {
                    let panel = Target::SolutionPanel(incoming);
                    surface.set_style(&panel, "opacity", "1");
                    surface.set_style(&panel, "transform", "translateY(0)");
                }
            }
            Timer::SolutionHide { generation } | Timer::SolutionReveal { generation } => {
                debug!(generation, current = self.generation, "solutions: stale continuation");
            }
            _ => {}
        }
    }

    /// ArrowUp/ArrowDown cycle the selection while the owning page is showing.
    pub fn on_key(&mut self, key: Key, surface: &mut dyn Surface) -> bool {
        if !self.page_active || self.ids.is_empty() {
            return false;
        }
        let current = self
            .selected
            .as_ref()
            .and_then(|selected| self.ids.iter().position(|id| id == selected));
        let next = match key {
            Key::ArrowDown => cycle_next(current, self.ids.len()),
            Key::ArrowUp => cycle_prev(current, self.ids.len()),
            _ => return false,
        };
        let id = self.ids[next].clone();
        self.select(&id, surface);
        true
    }

    fn lay_out(&mut self, id: &SolutionId, surface: &mut dyn Surface) {
        let panel = Target::SolutionPanel(id.clone());
        surface.set_style(&panel, "display", "block");
        surface.add_class(&panel, ACTIVE);
        self.shown = Some(id.clone());
    }
}

impl PageAware for SolutionSwitcher {
    fn owning_page(&self) -> &PageId {
        &self.page
    }

    fn on_page_change(&mut self, change: &PageChange, _surface: &mut dyn Surface) {
        self.page_active = change.current == self.page;
    }
}
