use std::time::Duration;

use shared::{
    domain::PageId,
    error::{Outcome, SkipReason},
    protocol::{Key, Section, Target, Timer},
};
use tracing::debug;

use crate::{
    bus::{PageAware, PageChange},
    surface::{css_delay, cycle_next, cycle_prev, ObserveOptions, Surface},
};

const HIGHLIGHTED: &str = "step-highlighted";
const COMPLETED: &str = "step-completed";
const ANIMATE_IN: &str = "animate-in";

pub struct RoadmapStepper {
    page: PageId,
    steps: usize,
    highlighted: Option<usize>,
    entered: bool,
    page_active: bool,
    press: Duration,
    stagger: Duration,
}

impl RoadmapStepper {
    pub fn new(
        page: PageId,
        steps: usize,
        press: Duration,
        stagger: Duration,
        observe: ObserveOptions,
        surface: &mut dyn Surface,
    ) -> Self {
        let highlighted =
            (0..steps).find(|i| surface.has_class(&Target::RoadmapStep(*i), HIGHLIGHTED));
        if surface.exists(&Target::RoadmapContainer) {
            surface.observe(Section::Roadmap, &Target::RoadmapContainer, observe);
        }
        Self {
            page,
            steps,
            highlighted,
            entered: false,
            page_active: false,
            press,
            stagger,
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn has_entered(&self) -> bool {
        self.entered
    }

    pub fn highlight(&mut self, index: usize, surface: &mut dyn Surface) -> Outcome<usize> {
        if index >= self.steps {
            return Outcome::Skipped(SkipReason::MissingTarget);
        }
        for i in 0..self.steps {
            surface.remove_class(&Target::RoadmapStep(i), HIGHLIGHTED);
        }
        surface.add_class(&Target::RoadmapStep(index), HIGHLIGHTED);
        self.highlighted = Some(index);
        Outcome::Applied(index)
    }

    /// Click: highlight plus a short press-down scale.
    pub fn click(&mut self, index: usize, surface: &mut dyn Surface) -> Outcome<usize> {
        let outcome = self.highlight(index, surface);
        if outcome.is_applied() {
            surface.set_style(&Target::RoadmapStep(index), "transform", "scale(0.95)");
            surface.schedule(self.press, Timer::StepPressRelease { index });
        }
        outcome
    }

    /// Marks `index` and every step before it completed.
    pub fn hover_enter(&mut self, index: usize, surface: &mut dyn Surface) {
        for i in 0..=index.min(self.steps.saturating_sub(1)) {
            surface.add_class(&Target::RoadmapStep(i), COMPLETED);
        }
    }

    /// Clears the completed marker from every step, not just the hovered one.
    pub fn hover_leave(&mut self, surface: &mut dyn Surface) {
        for i in 0..self.steps {
            surface.remove_class(&Target::RoadmapStep(i), COMPLETED);
        }
    }

    pub fn intersected(&mut self, surface: &mut dyn Surface) -> Outcome<()> {
        if self.entered {
            return Outcome::Skipped(SkipReason::RedundantAction);
        }
        self.entered = true;
        for i in 0..self.steps {
            let step = Target::RoadmapStep(i);
            surface.set_style(&step, "animation-delay", &css_delay(self.stagger * (i as u32 + 1)));
            surface.add_class(&step, ANIMATE_IN);
        }
        surface.unobserve(Section::Roadmap);
        debug!(steps = self.steps, "roadmap: entrance animation");
        Outcome::Applied(())
    }

    pub fn on_timer(&mut self, timer: &Timer, surface: &mut dyn Surface) {
        if let Timer::StepPressRelease { index } = *timer {
            surface.set_style(&Target::RoadmapStep(index), "transform", "");
        }
    }

    pub fn on_key(&mut self, key: Key, surface: &mut dyn Surface) -> bool {
        if !self.page_active || self.steps == 0 {
            return false;
        }
        let next = match key {
            Key::ArrowRight | Key::ArrowDown => cycle_next(self.highlighted, self.steps),
            Key::ArrowLeft | Key::ArrowUp => cycle_prev(self.highlighted, self.steps),
            _ => return false,
        };
        self.highlight(next, surface);
        surface.scroll_into_view(&Target::RoadmapStep(next));
        true
    }
}

impl PageAware for RoadmapStepper {
    fn owning_page(&self) -> &PageId {
        &self.page
    }

    fn on_page_change(&mut self, change: &PageChange, _surface: &mut dyn Surface) {
        self.page_active = change.current == self.page;
    }
}
