//! In-memory [`Surface`] with a virtual clock and a mutation journal.
//!
//! Used by the test suites and by the headless simulator.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use serde::Serialize;
use shared::protocol::{ScrollBehavior, Section, Target, Timer, UiInput};

use crate::{
    layout::SiteLayout,
    site::Site,
    surface::{ObserveOptions, Surface, TimerHandle},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeState {
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Mutation {
    AddClass { target: Target, class: String },
    RemoveClass { target: Target, class: String },
    SetStyle { target: Target, property: String, value: String },
    SetAttribute { target: Target, name: String, value: String },
    SetText { target: Target, text: String },
    Focus { target: Target },
    ScrollIntoView { target: Target },
    ScrollToTop { behavior: ScrollBehavior },
    PushFragment { fragment: String },
    Observe { section: Section, target: Target, options: ObserveOptions },
    Unobserve { section: Section },
    Schedule { handle: TimerHandle, timer: Timer, delay_ms: u64, repeating: bool },
    Cancel { handle: TimerHandle },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub mutation: Mutation,
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TimerHandle,
    timer: Timer,
    period: Option<Duration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub now_ms: u64,
    pub fragment: Option<String>,
    pub focused: Option<String>,
    pub scroll_top: f64,
    pub live_timers: usize,
    pub observing: Vec<Section>,
    pub nodes: BTreeMap<String, NodeState>,
}

#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: BTreeMap<Target, NodeState>,
    focused: Option<Target>,
    viewport_width: f64,
    scroll_top: f64,
    history: Vec<String>,
    observed: BTreeMap<Section, (Target, ObserveOptions)>,
    now: Duration,
    next_handle: u64,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Scheduled>,
    journal: Vec<JournalEntry>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            focused: None,
            viewport_width: 1280.0,
            scroll_top: 0.0,
            history: Vec::new(),
            observed: BTreeMap::new(),
            now: Duration::ZERO,
            next_handle: 1,
            next_seq: 0,
            queue: BTreeMap::new(),
            journal: Vec::new(),
        }
    }
}

impl MemorySurface {
    /// Creates one node for every element the layout describes.
    pub fn for_layout(layout: &SiteLayout) -> Self {
        let mut surface = Self::default();
        for page in &layout.pages {
            surface.insert(Target::Page(page.clone()));
            surface.insert(Target::NavLink(page.clone()));
        }
        for target in [Target::NavMenu, Target::NavToggle, Target::Navbar] {
            surface.insert(target);
        }
        for id in &layout.solutions {
            surface.insert(Target::ProblemCard(id.clone()));
            if layout.has_solution_panels {
                surface.insert(Target::SolutionPanel(id.clone()));
            }
        }
        if layout.roadmap_steps > 0 {
            surface.insert(Target::RoadmapContainer);
        }
        for i in 0..layout.roadmap_steps {
            surface.insert(Target::RoadmapStep(i));
        }
        if layout.product_buttons > 0 {
            surface.insert(Target::Gallery);
        }
        if layout.has_product_image {
            for target in [
                Target::ImageFrame,
                Target::ProductImage,
                Target::ProductTitle,
                Target::ProductDesc,
            ] {
                surface.insert(target);
            }
        }
        for i in 0..layout.product_buttons {
            surface.insert(Target::ProductButton(i));
        }
        if layout.construction_items > 0 {
            surface.insert(Target::ConstructionSection);
        }
        for i in 0..layout.construction_items {
            surface.insert(Target::ConstructionItem(i));
            surface.insert(Target::ConstructionHeader(i));
        }
        surface
    }

    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    /// Pre-existing markup class, not journaled.
    pub fn with_class(mut self, target: Target, class: &str) -> Self {
        self.nodes
            .entry(target)
            .or_default()
            .classes
            .insert(class.to_string());
        self
    }

    pub fn without(mut self, target: &Target) -> Self {
        self.nodes.remove(target);
        self
    }

    pub fn insert(&mut self, target: Target) {
        self.nodes.entry(target).or_default();
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn node(&self, target: &Target) -> Option<&NodeState> {
        self.nodes.get(target)
    }

    pub fn style(&self, target: &Target, property: &str) -> Option<&str> {
        self.nodes
            .get(target)
            .and_then(|node| node.styles.get(property))
            .map(String::as_str)
    }

    pub fn attribute(&self, target: &Target, name: &str) -> Option<&str> {
        self.nodes
            .get(target)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    pub fn text(&self, target: &Target) -> Option<&str> {
        self.nodes.get(target).and_then(|node| node.text.as_deref())
    }

    /// Targets carrying `class`, in `Target` order.
    pub fn with_class_named(&self, class: &str) -> Vec<&Target> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.classes.contains(class))
            .map(|(target, _)| target)
            .collect()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Simulates the user scrolling the document.
    pub fn scroll_by_user(&mut self, top: f64) {
        self.scroll_top = top;
    }

    pub fn is_observing(&self, section: Section) -> bool {
        self.observed.contains_key(&section)
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn live_timers(&self) -> usize {
        self.queue
            .values()
            .map(|scheduled| scheduled.handle)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.queue.values().any(|scheduled| scheduled.handle == handle)
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Pops the earliest timer due at or before `until` and moves the clock
    /// to its deadline. Repeating timers are re-armed.
    pub fn pop_due(&mut self, until: Duration) -> Option<Timer> {
        let (&key, _) = self.queue.iter().next()?;
        if key.0 > until {
            return None;
        }
        let scheduled = self.queue.remove(&key)?;
        self.now = key.0;
        if let Some(period) = scheduled.period {
            let seq = self.bump_seq();
            self.queue.insert(
                (self.now + period, seq),
                Scheduled {
                    handle: scheduled.handle,
                    timer: scheduled.timer.clone(),
                    period: Some(period),
                },
            );
        }
        Some(scheduled.timer)
    }

    /// Runs the virtual clock forward by `by`, handing every timer that falls
    /// due (including ones armed along the way) to `fire`. Returns how many
    /// fired.
    pub fn advance_with(&mut self, by: Duration, mut fire: impl FnMut(Timer, &mut Self)) -> usize {
        let until = self.now + by;
        let mut fired = 0;
        while let Some(timer) = self.pop_due(until) {
            fire(timer, self);
            fired += 1;
        }
        self.now = until;
        fired
    }

    pub fn advance(&mut self, site: &mut Site, by: Duration) -> usize {
        self.advance_with(by, |timer, surface| {
            site.dispatch(UiInput::Timer { timer }, surface);
        })
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            now_ms: self.now.as_millis() as u64,
            fragment: self.fragment().map(str::to_string),
            focused: self.focused.as_ref().map(ToString::to_string),
            scroll_top: self.scroll_top,
            live_timers: self.live_timers(),
            observing: self.observed.keys().copied().collect(),
            nodes: self
                .nodes
                .iter()
                .map(|(target, node)| (target.to_string(), node.clone()))
                .collect(),
        }
    }

    fn record(&mut self, mutation: Mutation) {
        self.journal.push(JournalEntry {
            at_ms: self.now.as_millis() as u64,
            mutation,
        });
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn arm(&mut self, delay: Duration, timer: Timer, period: Option<Duration>) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.bump_seq();
        self.record(Mutation::Schedule {
            handle,
            timer: timer.clone(),
            delay_ms: delay.as_millis() as u64,
            repeating: period.is_some(),
        });
        self.queue.insert(
            (self.now + delay, seq),
            Scheduled {
                handle,
                timer,
                period,
            },
        );
        handle
    }
}

impl Surface for MemorySurface {
    fn exists(&self, target: &Target) -> bool {
        self.nodes.contains_key(target)
    }

    fn has_class(&self, target: &Target, class: &str) -> bool {
        self.nodes
            .get(target)
            .is_some_and(|node| node.classes.contains(class))
    }

    fn add_class(&mut self, target: &Target, class: &str) {
        let Some(node) = self.nodes.get_mut(target) else {
            return;
        };
        if node.classes.insert(class.to_string()) {
            self.record(Mutation::AddClass {
                target: target.clone(),
                class: class.to_string(),
            });
        }
    }

    fn remove_class(&mut self, target: &Target, class: &str) {
        let Some(node) = self.nodes.get_mut(target) else {
            return;
        };
        if node.classes.remove(class) {
            self.record(Mutation::RemoveClass {
                target: target.clone(),
                class: class.to_string(),
            });
        }
    }

    fn set_style(&mut self, target: &Target, property: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(target) else {
            return;
        };
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_string(), value.to_string());
        }
        self.record(Mutation::SetStyle {
            target: target.clone(),
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    fn set_attribute(&mut self, target: &Target, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(target) else {
            return;
        };
        node.attributes.insert(name.to_string(), value.to_string());
        self.record(Mutation::SetAttribute {
            target: target.clone(),
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn set_text(&mut self, target: &Target, text: &str) {
        let Some(node) = self.nodes.get_mut(target) else {
            return;
        };
        node.text = Some(text.to_string());
        self.record(Mutation::SetText {
            target: target.clone(),
            text: text.to_string(),
        });
    }

    fn focus(&mut self, target: &Target) {
        if !self.exists(target) {
            return;
        }
        self.focused = Some(target.clone());
        self.record(Mutation::Focus {
            target: target.clone(),
        });
    }

    fn focused(&self) -> Option<Target> {
        self.focused.clone()
    }

    fn scroll_into_view(&mut self, target: &Target) {
        if self.exists(target) {
            self.record(Mutation::ScrollIntoView {
                target: target.clone(),
            });
        }
    }

    fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        self.scroll_top = 0.0;
        self.record(Mutation::ScrollToTop { behavior });
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn push_fragment(&mut self, fragment: &str) {
        self.history.push(fragment.to_string());
        self.record(Mutation::PushFragment {
            fragment: fragment.to_string(),
        });
    }

    fn observe(&mut self, section: Section, target: &Target, options: ObserveOptions) {
        if !self.exists(target) {
            return;
        }
        self.observed.insert(section, (target.clone(), options));
        self.record(Mutation::Observe {
            section,
            target: target.clone(),
            options,
        });
    }

    fn unobserve(&mut self, section: Section) {
        if self.observed.remove(&section).is_some() {
            self.record(Mutation::Unobserve { section });
        }
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        self.arm(delay, timer, None)
    }

    fn schedule_repeating(&mut self, period: Duration, timer: Timer) -> TimerHandle {
        self.arm(period, timer, Some(period))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let before = self.queue.len();
        self.queue.retain(|_, scheduled| scheduled.handle != handle);
        if self.queue.len() != before {
            self.record(Mutation::Cancel { handle });
        }
    }
}
