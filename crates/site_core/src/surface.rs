//! Capability seam between the components and whatever renders the page.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::protocol::{ScrollBehavior, Section, Target, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserveOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Shrinks the viewport's bottom edge by this many pixels.
    pub bottom_margin_px: u32,
}

impl ObserveOptions {
    pub fn new(threshold: f64, bottom_margin_px: u32) -> Self {
        Self {
            threshold,
            bottom_margin_px,
        }
    }

    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }
}

/// DOM, viewport, history and timer capabilities.
///
/// Every mutation targeting an element that is absent from the host markup is
/// silently ignored by implementations; queries on absent elements report
/// `false`/`None`.
pub trait Surface {
    fn exists(&self, target: &Target) -> bool;
    fn has_class(&self, target: &Target, class: &str) -> bool;
    fn add_class(&mut self, target: &Target, class: &str);
    fn remove_class(&mut self, target: &Target, class: &str);
    fn set_style(&mut self, target: &Target, property: &str, value: &str);
    fn set_attribute(&mut self, target: &Target, name: &str, value: &str);
    fn set_text(&mut self, target: &Target, text: &str);

    fn focus(&mut self, target: &Target);
    fn focused(&self) -> Option<Target>;
    fn scroll_into_view(&mut self, target: &Target);
    fn scroll_to_top(&mut self, behavior: ScrollBehavior);
    fn viewport_width(&self) -> f64;

    /// Adds a history entry for `#fragment` without reloading.
    fn push_fragment(&mut self, fragment: &str);

    /// Delivers `UiInput::Intersected { section }` whenever `target` crosses
    /// the threshold, until `unobserve` is called.
    fn observe(&mut self, section: Section, target: &Target, options: ObserveOptions);
    fn unobserve(&mut self, section: Section);

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle;
    fn schedule_repeating(&mut self, period: Duration, timer: Timer) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);

    /// Fires `timer` once, when the opacity transition of `target` itself
    /// ends or after `fallback`, whichever happens first.
    fn after_transition(&mut self, target: &Target, fallback: Duration, timer: Timer) -> TimerHandle {
        let _ = target;
        self.schedule(fallback, timer)
    }

    fn set_class(&mut self, target: &Target, class: &str, on: bool) {
        if on {
            self.add_class(target, class);
        } else {
            self.remove_class(target, class);
        }
    }
}

/// CSS time value for a delay.
pub fn css_delay(delay: Duration) -> String {
    format!("{}ms", delay.as_millis())
}

/// Cyclic neighbour used by every arrow-key handler. With nothing current,
/// next is the first item and previous the last.
pub(crate) fn cycle_next(current: Option<usize>, len: usize) -> usize {
    match current {
        Some(i) if i + 1 < len => i + 1,
        _ => 0,
    }
}

pub(crate) fn cycle_prev(current: Option<usize>, len: usize) -> usize {
    match current {
        Some(i) if i > 0 => i - 1,
        _ => len.saturating_sub(1),
    }
}
