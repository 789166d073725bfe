//! Product carousel: two-phase image swap, autoplay, keyboard and swipe.
//!
//! `switch_to` moves `Idle -> Dimming -> Settling -> Idle`. Content is only
//! swapped at the end of `Dimming`, while the frame is dimmed, and a new
//! switch is refused until the carousel is back to `Idle`. Autoplay is an
//! orthogonal flag backed by at most one repeating timer.

use shared::{
    domain::{PageId, ProductCatalog},
    error::{Outcome, SkipReason},
    protocol::{Key, Section, Target, Timer},
};
use tracing::{debug, info};

use crate::{
    bus::{PageAware, PageChange},
    config::{ms, Timings},
    surface::{css_delay, ObserveOptions, Surface, TimerHandle},
};

const ACTIVE: &str = "active";
const ANIMATE_IN: &str = "animate-in";
const DIMMED_OPACITY: &str = "0.3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dimming,
    Settling,
}

pub struct ProductCarousel {
    page: PageId,
    catalog: ProductCatalog,
    buttons: usize,
    current: usize,
    phase: Phase,
    autoplay: Option<TimerHandle>,
    page_active: bool,
    document_hidden: bool,
    pointer_inside: bool,
    touch_start_x: Option<f64>,
    entered: bool,
    swipe_threshold_px: f64,
    timings: Timings,
}

impl ProductCarousel {
    pub fn new(
        page: PageId,
        catalog: ProductCatalog,
        buttons: usize,
        swipe_threshold_px: f64,
        timings: Timings,
        observe: ObserveOptions,
        surface: &mut dyn Surface,
    ) -> Self {
        if surface.exists(&Target::Gallery) {
            surface.observe(Section::Gallery, &Target::Gallery, observe);
        }
        Self {
            page,
            catalog,
            buttons,
            current: 0,
            phase: Phase::Idle,
            autoplay: None,
            page_active: false,
            document_hidden: false,
            pointer_inside: false,
            touch_start_x: None,
            entered: false,
            swipe_threshold_px,
            timings,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Starts a transition to `index` (normalized cyclically). Ignored while a
    /// transition is running or when the target is already current.
    pub fn switch_to(&mut self, index: i64, surface: &mut dyn Surface) -> Outcome<usize> {
        if self.is_animating() {
            return Outcome::Skipped(SkipReason::Busy);
        }
        let target = self.catalog.normalize(index);
        if target == self.current {
            return Outcome::Skipped(SkipReason::RedundantAction);
        }

        self.phase = Phase::Dimming;
        self.current = target;

        for i in 0..self.buttons {
            surface.set_class(&Target::ProductButton(i), ACTIVE, i == target);
        }
        let dim = ms(self.timings.carousel_dim_ms);
        surface.set_style(
            &Target::ImageFrame,
            "transition",
            &format!("opacity {} ease", css_delay(dim)),
        );
        surface.set_style(&Target::ImageFrame, "opacity", DIMMED_OPACITY);
        surface.after_transition(&Target::ImageFrame, dim, Timer::CarouselSwap);

        debug!(index = target, "carousel: switching");
        Outcome::Applied(target)
    }

    pub fn next(&mut self, surface: &mut dyn Surface) -> Outcome<usize> {
        self.switch_to(self.current as i64 + 1, surface)
    }

    pub fn previous(&mut self, surface: &mut dyn Surface) -> Outcome<usize> {
        self.switch_to(self.current as i64 - 1, surface)
    }

    fn swap_content(&mut self, surface: &mut dyn Surface) {
        if self.phase != Phase::Dimming {
            return;
        }
        if let Some(product) = self.catalog.get(self.current) {
            surface.set_attribute(&Target::ProductImage, "src", &product.image);
            surface.set_attribute(&Target::ProductImage, "alt", &product.title);
            surface.set_text(&Target::ProductTitle, &product.title);
            surface.set_text(&Target::ProductDesc, &product.description);
        }
        surface.set_style(&Target::ImageFrame, "opacity", "1");
        surface.set_style(&Target::ProductImage, "transform", "scale(0.98)");
        surface.schedule(ms(self.timings.carousel_settle_ms), Timer::CarouselSettle);
        self.phase = Phase::Settling;
    }

    fn settle(&mut self, surface: &mut dyn Surface) {
        if self.phase != Phase::Settling {
            return;
        }
        surface.set_style(&Target::ProductImage, "transform", "scale(1)");
        self.phase = Phase::Idle;
    }

    pub fn start_autoplay(&mut self, surface: &mut dyn Surface) -> Outcome<()> {
        if self.autoplay.is_some() {
            return Outcome::Skipped(SkipReason::RedundantAction);
        }
        if !self.page_active {
            return Outcome::Skipped(SkipReason::PageInactive);
        }
        let handle = surface.schedule_repeating(
            ms(self.timings.autoplay_interval_ms),
            Timer::AutoplayTick,
        );
        self.autoplay = Some(handle);
        debug!(handle = handle.0, "carousel: autoplay started");
        Outcome::Applied(())
    }

    pub fn stop_autoplay(&mut self, surface: &mut dyn Surface) -> Outcome<()> {
        match self.autoplay.take() {
            Some(handle) => {
                surface.cancel(handle);
                debug!(handle = handle.0, "carousel: autoplay stopped");
                Outcome::Applied(())
            }
            None => Outcome::Skipped(SkipReason::RedundantAction),
        }
    }

    fn schedule_resume(&mut self, delay_ms: u64, surface: &mut dyn Surface) {
        surface.schedule(ms(delay_ms), Timer::AutoplayResume);
    }

    /// Deferred restart; re-checks everything that may have changed while
    /// the grace delay was pending.
    fn resume(&mut self, surface: &mut dyn Surface) -> Outcome<()> {
        if self.document_hidden || self.pointer_inside || self.touch_start_x.is_some() {
            return Outcome::Skipped(SkipReason::Busy);
        }
        self.start_autoplay(surface)
    }

    pub fn pointer_enter(&mut self, surface: &mut dyn Surface) {
        self.pointer_inside = true;
        self.stop_autoplay(surface);
    }

    pub fn pointer_leave(&mut self, surface: &mut dyn Surface) {
        self.pointer_inside = false;
        if self.page_active {
            self.schedule_resume(self.timings.pointer_resume_ms, surface);
        }
    }

    pub fn touch_start(&mut self, x: f64, surface: &mut dyn Surface) {
        self.touch_start_x = Some(x);
        self.stop_autoplay(surface);
    }

    pub fn touch_end(&mut self, x: f64, surface: &mut dyn Surface) -> Outcome<usize> {
        let outcome = match self.touch_start_x.take() {
            Some(start) => self.swipe(start - x, surface),
            None => Outcome::Skipped(SkipReason::MissingTarget),
        };
        if self.page_active {
            self.schedule_resume(self.timings.touch_resume_ms, surface);
        }
        outcome
    }

    /// `delta` is touch-start X minus touch-end X: positive selects the next
    /// product, negative the previous one.
    pub fn swipe(&mut self, delta: f64, surface: &mut dyn Surface) -> Outcome<usize> {
        if delta.abs() <= self.swipe_threshold_px {
            return Outcome::Skipped(SkipReason::BelowThreshold);
        }
        if delta > 0.0 {
            self.next(surface)
        } else {
            self.previous(surface)
        }
    }

    pub fn visibility_changed(&mut self, hidden: bool, surface: &mut dyn Surface) {
        self.document_hidden = hidden;
        if hidden {
            self.stop_autoplay(surface);
        } else if self.page_active {
            self.schedule_resume(self.timings.visibility_resume_ms, surface);
        }
    }

    pub fn intersected(&mut self, surface: &mut dyn Surface) -> Outcome<()> {
        if self.entered {
            return Outcome::Skipped(SkipReason::RedundantAction);
        }
        self.entered = true;
        surface.unobserve(Section::Gallery);
        surface.schedule(ms(self.timings.gallery_entrance_ms), Timer::GalleryEntrance);
        Outcome::Applied(())
    }

    fn entrance(&mut self, surface: &mut dyn Surface) {
        let stagger = ms(self.timings.stagger_ms);
        for i in 0..self.buttons {
            let button = Target::ProductButton(i);
            surface.set_style(&button, "animation-delay", &css_delay(stagger * i as u32));
            surface.add_class(&button, ANIMATE_IN);
        }
        if self.page_active {
            self.schedule_resume(self.timings.gallery_autoplay_ms, surface);
        }
    }

    /// Buttons beyond the catalog have no product to show.
    pub fn button_click(&mut self, index: usize, surface: &mut dyn Surface) -> Outcome<usize> {
        if index >= self.catalog.len() {
            debug!(index, products = self.catalog.len(), "carousel: button has no product");
            return Outcome::Skipped(SkipReason::MissingTarget);
        }
        self.switch_to(index as i64, surface)
    }

    pub fn button_key(&mut self, index: usize, key: Key, surface: &mut dyn Surface) -> bool {
        if !key.is_activation() {
            return false;
        }
        self.button_click(index, surface) != Outcome::Skipped(SkipReason::MissingTarget)
    }

    /// Digits 1..=N pick a product directly, Left/Right step through them.
    pub fn on_key(&mut self, key: Key, surface: &mut dyn Surface) -> bool {
        if !self.page_active {
            return false;
        }
        match key {
            Key::ArrowLeft => {
                self.previous(surface);
            }
            Key::ArrowRight => {
                self.next(surface);
            }
            Key::Digit(digit) if digit >= 1 && usize::from(digit) <= self.catalog.len() => {
                self.switch_to(i64::from(digit) - 1, surface);
            }
            _ => return false,
        }
        true
    }

    pub fn on_timer(&mut self, timer: &Timer, surface: &mut dyn Surface) {
        match timer {
            Timer::CarouselSwap => self.swap_content(surface),
            Timer::CarouselSettle => self.settle(surface),
            Timer::AutoplayTick if self.autoplay.is_some() => {
                let outcome = self.next(surface);
                if let Some(reason) = outcome.skip_reason() {
                    debug!(?reason, "carousel: autoplay tick skipped");
                }
            }
            Timer::AutoplayResume => {
                self.resume(surface);
            }
            Timer::GalleryEntrance => self.entrance(surface),
            _ => {}
        }
    }
}

impl PageAware for ProductCarousel {
    fn owning_page(&self) -> &PageId {
        &self.page
    }

    fn on_page_change(&mut self, change: &PageChange, surface: &mut dyn Surface) {
        self.page_active = change.current == self.page;
        if change.entered(&self.page) {
            info!("carousel: page={} active, autoplay pending", self.page);
            self.schedule_resume(self.timings.nav_resume_ms, surface);
        } else if change.left(&self.page) {
            self.stop_autoplay(surface);
        }
    }
}
