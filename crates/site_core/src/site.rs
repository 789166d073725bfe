//! Composition point: builds every component once and routes inputs.

use shared::{
    domain::PageId,
    error::{Outcome, SiteError},
    protocol::{ScrollBehavior, Section, Timer, UiInput},
};
use tracing::{debug, info, warn};

use crate::{
    accordion::AccordionGroup,
    bus::{ActivePage, PageAware},
    carousel::ProductCarousel,
    config::{ms, SiteConfig},
    layout::SiteLayout,
    nav::NavChrome,
    roadmap::RoadmapStepper,
    router::PageRouter,
    solutions::SolutionSwitcher,
    surface::{ObserveOptions, Surface},
};

/// What the driver should do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub prevent_default: bool,
}

impl Dispatch {
    fn prevent(prevent_default: bool) -> Self {
        Self { prevent_default }
    }
}

pub struct Site {
    config: SiteConfig,
    bus: ActivePage,
    router: PageRouter,
    nav: NavChrome,
    solutions: Option<SolutionSwitcher>,
    roadmap: Option<RoadmapStepper>,
    carousel: Option<ProductCarousel>,
    accordion: Option<AccordionGroup>,
}

impl Site {
    /// Builds the components the markup supports, then shows the page named
    /// by `initial_fragment` (home when absent or unknown).
    pub fn mount(
        layout: &SiteLayout,
        config: SiteConfig,
        initial_fragment: Option<&str>,
        surface: &mut dyn Surface,
    ) -> Result<Self, SiteError> {
        config.validate()?;
        let timings = &config.timings;
        let observers = &config.observers;

        let router = PageRouter::new(
            layout.pages.clone(),
            config.home_page.clone(),
            config.mobile_breakpoint_px,
            ms(timings.home_scroll_recheck_ms),
        );
        if router.home() != &config.home_page {
            warn!(
                "site: home page={} missing from markup; using page={}",
                config.home_page,
                router.home()
            );
        }
        let nav = NavChrome::new(config.mobile_breakpoint_px, config.navbar.clone());

        let solutions = (!layout.solutions.is_empty() && layout.has_solution_panels).then(|| {
            SolutionSwitcher::new(
                config.pages.solutions.clone(),
                layout.solutions.clone(),
                ms(timings.solution_fade_out_ms),
                ms(timings.solution_fade_in_ms),
                surface,
            )
        });

        let roadmap = (layout.roadmap_steps > 0).then(|| {
            RoadmapStepper::new(
                config.pages.roadmap.clone(),
                layout.roadmap_steps,
                ms(timings.step_press_ms),
                ms(timings.stagger_ms),
                ObserveOptions::new(observers.roadmap_threshold, 0),
                surface,
            )
        });

        let carousel = (layout.product_buttons > 0 && layout.has_product_image).then(|| {
            ProductCarousel::new(
                config.pages.carousel.clone(),
                config.products.clone(),
                layout.product_buttons,
                config.swipe_threshold_px,
                timings.clone(),
                ObserveOptions::new(observers.gallery_threshold, observers.bottom_margin_px),
                surface,
            )
        });

        let accordion = (layout.construction_items > 0).then(|| {
            AccordionGroup::new(
                config.pages.accordion.clone(),
                layout.construction_items,
                ms(timings.stagger_ms),
                ObserveOptions::new(observers.construction_threshold, observers.bottom_margin_px),
                surface,
            )
        });

        let mut site = Self {
            config,
            bus: ActivePage::default(),
            router,
            nav,
            solutions,
            roadmap,
            carousel,
            accordion,
        };

        let outcome = site.router.restore(initial_fragment, surface);
        site.publish(outcome, surface);
        surface.scroll_to_top(ScrollBehavior::Instant);

        info!(
            pages = layout.pages.len(),
            solutions = site.solutions.is_some(),
            roadmap = site.roadmap.is_some(),
            carousel = site.carousel.is_some(),
            accordion = site.accordion.is_some(),
            "site: mounted"
        );
        Ok(site)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn active_page(&self) -> Option<&PageId> {
        self.bus.current()
    }

    pub fn router(&self) -> &PageRouter {
        &self.router
    }

    pub fn solutions(&self) -> Option<&SolutionSwitcher> {
        self.solutions.as_ref()
    }

    pub fn roadmap(&self) -> Option<&RoadmapStepper> {
        self.roadmap.as_ref()
    }

    pub fn carousel(&self) -> Option<&ProductCarousel> {
        self.carousel.as_ref()
    }

    pub fn accordion(&self) -> Option<&AccordionGroup> {
        self.accordion.as_ref()
    }

    pub fn dispatch(&mut self, input: UiInput, surface: &mut dyn Surface) -> Dispatch {
        debug!(input = input.name(), "site: dispatch");
        match input {
            UiInput::Loaded => {
                surface.schedule(
                    ms(self.config.timings.load_scroll_reset_ms),
                    Timer::LoadScrollReset,
                );
            }
            UiInput::NavClick { page } => {
                let outcome = self.router.navigate(&page, surface);
                self.publish(outcome, surface);
                return Dispatch::prevent(true);
            }
            UiInput::PopState { fragment } => {
                let outcome = self.router.restore(fragment.as_deref(), surface);
                self.publish(outcome, surface);
            }
            UiInput::NavToggleClick => self.nav.toggle_menu(surface),
            UiInput::DocumentClick { inside_nav } => self.nav.document_click(inside_nav, surface),
            UiInput::Resize { width } => self.nav.resize(width, surface),
            UiInput::Scroll { top } => self.nav.scroll(top, surface),
            UiInput::Key { key } => {
                let mut handled = false;
                if let Some(solutions) = self.solutions.as_mut() {
                    handled |= solutions.on_key(key, surface);
                }
                if let Some(roadmap) = self.roadmap.as_mut() {
                    handled |= roadmap.on_key(key, surface);
                }
                if let Some(carousel) = self.carousel.as_mut() {
                    handled |= carousel.on_key(key, surface);
                }
                if let Some(accordion) = self.accordion.as_mut() {
                    handled |= accordion.on_key(key, surface);
                }
                return Dispatch::prevent(handled);
            }
            UiInput::ProblemCardClick { solution } => {
                if let Some(solutions) = self.solutions.as_mut() {
                    solutions.select(&solution, surface);
                }
            }
            UiInput::StepClick { index } => {
                if let Some(roadmap) = self.roadmap.as_mut() {
                    roadmap.click(index, surface);
                }
            }
            UiInput::StepEnter { index } => {
                if let Some(roadmap) = self.roadmap.as_mut() {
                    roadmap.hover_enter(index, surface);
                }
            }
            UiInput::StepLeave { .. } => {
                if let Some(roadmap) = self.roadmap.as_mut() {
                    roadmap.hover_leave(surface);
                }
            }
            UiInput::ProductButtonClick { index } => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.button_click(index, surface);
                }
            }
            UiInput::ProductButtonKey { index, key } => {
                if let Some(carousel) = self.carousel.as_mut() {
                    return Dispatch::prevent(carousel.button_key(index, key, surface));
                }
            }
            UiInput::GalleryPointerEnter => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.pointer_enter(surface);
                }
            }
            UiInput::GalleryPointerLeave => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.pointer_leave(surface);
                }
            }
            UiInput::TouchStart { x } => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.touch_start(x, surface);
                }
            }
            UiInput::TouchEnd { x } => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.touch_end(x, surface);
                }
            }
            UiInput::VisibilityChange { hidden } => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.visibility_changed(hidden, surface);
                }
            }
            UiInput::Intersected { section } => self.intersected(section, surface),
            UiInput::HeaderClick { index } => {
                if let Some(accordion) = self.accordion.as_mut() {
                    accordion.toggle(index, surface);
                }
            }
            UiInput::HeaderKey { index, key } => {
                if let Some(accordion) = self.accordion.as_mut() {
                    return Dispatch::prevent(accordion.header_key(index, key, surface));
                }
            }
            UiInput::Timer { timer } => self.fire(&timer, surface),
        }
        Dispatch::default()
    }

    fn intersected(&mut self, section: Section, surface: &mut dyn Surface) {
        let outcome = match section {
            Section::Roadmap => self.roadmap.as_mut().map(|c| c.intersected(surface)),
            Section::Gallery => self.carousel.as_mut().map(|c| c.intersected(surface)),
            Section::Construction => self.accordion.as_mut().map(|c| c.intersected(surface)),
        };
        if let Some(reason) = outcome.and_then(|o| o.skip_reason()) {
            debug!(?section, ?reason, "site: intersection ignored");
        }
    }

    fn fire(&mut self, timer: &Timer, surface: &mut dyn Surface) {
        match timer {
            Timer::HomeScrollRecheck | Timer::LoadScrollReset => {
                surface.scroll_to_top(ScrollBehavior::Instant);
            }
            Timer::SolutionHide { .. } | Timer::SolutionReveal { .. } => {
                if let Some(solutions) = self.solutions.as_mut() {
                    solutions.on_timer(timer, surface);
                }
            }
            Timer::StepPressRelease { .. } => {
                if let Some(roadmap) = self.roadmap.as_mut() {
                    roadmap.on_timer(timer, surface);
                }
            }
            Timer::CarouselSwap
            | Timer::CarouselSettle
            | Timer::AutoplayTick
            | Timer::AutoplayResume
            | Timer::GalleryEntrance => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.on_timer(timer, surface);
                }
            }
        }
    }

    /// Publishes a router result on the notifier and fans the change out.
    fn publish(&mut self, outcome: Outcome<PageId>, surface: &mut dyn Surface) {
        let Some(page) = outcome.applied() else {
            return;
        };
        let Some(change) = self.bus.publish(page) else {
            return;
        };
        let mut subscribers: Vec<&mut dyn PageAware> = Vec::new();
        if let Some(solutions) = self.solutions.as_mut() {
            subscribers.push(solutions);
        }
        if let Some(roadmap) = self.roadmap.as_mut() {
            subscribers.push(roadmap);
        }
        if let Some(carousel) = self.carousel.as_mut() {
            subscribers.push(carousel);
        }
        if let Some(accordion) = self.accordion.as_mut() {
            subscribers.push(accordion);
        }
        for subscriber in subscribers {
            subscriber.on_page_change(&change, surface);
        }
    }
}
