//! DOM event listeners translated into `UiInput`s.

use std::rc::{Rc, Weak};

use anyhow::Context;
use shared::{
    domain::{PageId, SolutionId},
    protocol::{Key, Target, UiInput},
};
use site_core::SiteLayout;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    AddEventListenerOptions, Document, Event, EventTarget, HtmlElement, KeyboardEvent, Node,
    TouchEvent, Window,
};

use crate::{app::Runtime, dom, js_error};

/// A registered listener; removed from its target when dropped.
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    /// Registers `handler`. A passive listener promises never to call
    /// `preventDefault`, which keeps touch scrolling off the main thread.
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let function = callback.as_ref().unchecked_ref();
        let added = if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind, function, &options,
            )
        } else {
            target.add_event_listener_with_callback(kind, function)
        };
        added
            .map_err(js_error)
            .with_context(|| format!("adding {kind} listener"))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Default)]
pub struct Listeners {
    registered: Vec<EventListener>,
    runtime: Weak<Runtime>,
}

fn key_of(event: &Event) -> Option<Key> {
    event
        .dyn_ref::<KeyboardEvent>()
        .map(|event| Key::from_dom(&event.key()))
}

fn touch_x(event: &Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
    Some(f64::from(touch.screen_x()))
}

impl Listeners {
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Listens for `kind` on `target`; `map` turns the event into an input or
    /// `None` to ignore it. The input's `Dispatch` decides `preventDefault`.
    fn on(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        map: impl Fn(&Event) -> Option<UiInput> + 'static,
    ) -> anyhow::Result<()> {
        let runtime = self.runtime.clone();
        let listener = EventListener::new(target, kind, false, move |event: Event| {
            let Some(input) = map(&event) else {
                return;
            };
            let Some(runtime) = runtime.upgrade() else {
                return;
            };
            if runtime.submit(input).prevent_default {
                event.prevent_default();
            }
        })?;
        self.registered.push(listener);
        Ok(())
    }

    /// Like `on`, for inputs whose default action is never cancelled.
    fn on_passive(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        map: impl Fn(&Event) -> Option<UiInput> + 'static,
    ) -> anyhow::Result<()> {
        let runtime = self.runtime.clone();
        let listener = EventListener::new(target, kind, true, move |event: Event| {
            if let (Some(input), Some(runtime)) = (map(&event), runtime.upgrade()) {
                runtime.submit(input);
            }
        })?;
        self.registered.push(listener);
        Ok(())
    }

    fn on_each(
        &mut self,
        elements: &[HtmlElement],
        kind: &'static str,
        map: impl Fn(usize, &Event) -> Option<UiInput> + Clone + 'static,
    ) -> anyhow::Result<()> {
        for (index, element) in elements.iter().enumerate() {
            let map = map.clone();
            self.on(element, kind, move |event| map(index, event))?;
        }
        Ok(())
    }

    pub fn attach(
        runtime: &Rc<Runtime>,
        window: &Window,
        document: &Document,
        layout: &SiteLayout,
    ) -> anyhow::Result<Self> {
        let mut listeners = Self {
            registered: Vec::new(),
            runtime: Rc::downgrade(runtime),
        };
        listeners.attach_navigation(window, document)?;
        listeners.attach_components(document, layout)?;
        Ok(listeners)
    }

    fn attach_navigation(&mut self, window: &Window, document: &Document) -> anyhow::Result<()> {
        for link in dom::query_all(document, dom::NAV_LINK) {
            let Some(page) = link.get_attribute(dom::DATA_PAGE) else {
                continue;
            };
            let page = PageId::new(page);
            self.on(&link, "click", move |_| {
                Some(UiInput::NavClick { page: page.clone() })
            })?;
        }

        let location = window.location();
        self.on(window, "popstate", move |_| {
            Some(UiInput::PopState {
                fragment: location.hash().ok(),
            })
        })?;

        let toggle = dom::find(document, &Target::NavToggle);
        let menu = dom::find(document, &Target::NavMenu);
        if let Some(toggle) = &toggle {
            self.on(toggle, "click", |_| Some(UiInput::NavToggleClick))?;
        }
        self.on(document, "click", move |event| {
            let node = event.target().and_then(|target| target.dyn_into::<Node>().ok());
            let inside_nav = [&toggle, &menu]
                .into_iter()
                .flatten()
                .any(|element| element.contains(node.as_ref()));
            Some(UiInput::DocumentClick { inside_nav })
        })?;

        let resize_window = window.clone();
        self.on(window, "resize", move |_| {
            let width = resize_window.inner_width().ok()?.as_f64()?;
            Some(UiInput::Resize { width })
        })?;

        let scroll_window = window.clone();
        let scroll_document = document.clone();
        self.on(window, "scroll", move |_| {
            let top = scroll_window
                .page_y_offset()
                .ok()
                .filter(|top| *top > 0.0)
                .or_else(|| {
                    scroll_document
                        .document_element()
                        .map(|root| f64::from(root.scroll_top()))
                })
                .unwrap_or_default();
            Some(UiInput::Scroll { top })
        })?;

        self.on(window, "load", |_| Some(UiInput::Loaded))?;

        self.on(document, "keydown", |event| {
            key_of(event).map(|key| UiInput::Key { key })
        })?;

        let visibility_document = document.clone();
        self.on(document, "visibilitychange", move |_| {
            Some(UiInput::VisibilityChange {
                hidden: visibility_document.hidden(),
            })
        })?;
        Ok(())
    }

    fn attach_components(&mut self, document: &Document, layout: &SiteLayout) -> anyhow::Result<()> {
        for card in dom::query_all(document, dom::PROBLEM_CARD) {
            let Some(solution) = card.get_attribute(dom::DATA_SOLUTION) else {
                continue;
            };
            let solution = SolutionId::new(solution);
            self.on(&card, "click", move |_| {
                Some(UiInput::ProblemCardClick {
                    solution: solution.clone(),
                })
            })?;
        }

        if layout.roadmap_steps > 0 {
            let steps = dom::query_all(document, dom::ROADMAP_STEP);
            self.on_each(&steps, "click", |index, _| Some(UiInput::StepClick { index }))?;
            self.on_each(&steps, "mouseenter", |index, _| Some(UiInput::StepEnter { index }))?;
            self.on_each(&steps, "mouseleave", |index, _| Some(UiInput::StepLeave { index }))?;
        }

        if layout.product_buttons > 0 {
            let buttons = dom::query_all(document, dom::PRODUCT_BUTTON);
            self.on_each(&buttons, "click", |index, _| {
                Some(UiInput::ProductButtonClick { index })
            })?;
            self.on_each(&buttons, "keydown", |index, event| {
                key_of(event).map(|key| UiInput::ProductButtonKey { index, key })
            })?;
        }

        if let Some(gallery) = dom::find(document, &Target::Gallery) {
            self.on(&gallery, "mouseenter", |_| Some(UiInput::GalleryPointerEnter))?;
            self.on(&gallery, "mouseleave", |_| Some(UiInput::GalleryPointerLeave))?;
            self.on_passive(&gallery, "touchstart", |event| {
                touch_x(event).map(|x| UiInput::TouchStart { x })
            })?;
            self.on_passive(&gallery, "touchend", |event| {
                touch_x(event).map(|x| UiInput::TouchEnd { x })
            })?;
        }

        for index in 0..layout.construction_items {
            let Some(header) = dom::find(document, &Target::ConstructionHeader(index)) else {
                continue;
            };
            self.on(&header, "click", move |_| Some(UiInput::HeaderClick { index }))
                .context("wiring construction headers")?;
            self.on(&header, "keydown", move |event| {
                key_of(event).map(|key| UiInput::HeaderKey { index, key })
            })?;
        }
        Ok(())
    }
}
