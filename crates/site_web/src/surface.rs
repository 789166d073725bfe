//! `Surface` over the live document.

use std::{collections::HashMap, rc::Weak, time::Duration};

use shared::protocol::{ScrollBehavior, Section, Target, Timer, UiInput};
use site_core::{ObserveOptions, Surface, TimerHandle};
use tracing::debug;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions,
    TransitionEvent, Window,
};

use crate::{
    app::Runtime,
    dom,
    timers::{Entry, FADED_PROPERTY, TRANSITION_END},
};

struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub struct WebSurface {
    window: Window,
    document: Document,
    runtime: Weak<Runtime>,
    observers: HashMap<Section, Observer>,
}

fn log_js(result: Result<(), JsValue>, op: &str) {
    if let Err(err) = result {
        debug!(?err, "surface: {op} failed");
    }
}

/// Hands a fired timer back to the runtime. One-shot entries are released
/// first so a racing second path (transition end vs fallback) finds nothing.
fn fire(runtime: &Weak<Runtime>, handle: TimerHandle, timer: &Timer, repeating: bool) {
    let Some(runtime) = runtime.upgrade() else {
        return;
    };
    let live = match runtime.timers().try_borrow_mut() {
        Ok(timers) if repeating => timers.contains(handle),
        Ok(mut timers) => timers.release(handle),
        Err(_) => false,
    };
    if live {
        runtime.submit(UiInput::Timer {
            timer: timer.clone(),
        });
    }
}

/// `transitionend` bubbles from descendants and fires once per property, so
/// only the watched element's own opacity transition ends a phase.
pub(crate) fn ends_fade(event: &Event, watched: &JsValue) -> bool {
    let own = event
        .target()
        .is_some_and(|target| JsValue::from(target) == *watched);
    own && event
        .dyn_ref::<TransitionEvent>()
        .is_some_and(|transition| transition.property_name() == FADED_PROPERTY)
}

impl WebSurface {
    pub fn new(window: Window, document: Document, runtime: Weak<Runtime>) -> Self {
        Self {
            window,
            document,
            runtime,
            observers: HashMap::new(),
        }
    }

    fn element(&self, target: &Target) -> Option<HtmlElement> {
        dom::find(&self.document, target)
    }

    fn timer_callback(&self, handle: TimerHandle, timer: Timer, repeating: bool) -> Closure<dyn FnMut()> {
        let runtime = self.runtime.clone();
        Closure::<dyn FnMut()>::new(move || fire(&runtime, handle, &timer, repeating))
    }

    fn arm(&mut self, delay: Duration, timer: Timer, repeating: bool) -> TimerHandle {
        let Some(runtime) = self.runtime.upgrade() else {
            return TimerHandle(0);
        };
        let mut timers = runtime.timers().borrow_mut();
        let handle = timers.allocate();
        let callback = self.timer_callback(handle, timer, repeating);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let function = callback.as_ref().unchecked_ref();
        let armed = if repeating {
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_0(function, millis)
                .map(|id| Entry::Interval {
                    id,
                    _callback: callback,
                })
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(function, millis)
                .map(|id| Entry::Timeout {
                    id,
                    _callback: callback,
                })
        };
        match armed {
            Ok(entry) => timers.insert(handle, entry),
            Err(err) => debug!(?err, "surface: arming timer failed"),
        }
        handle
    }
}

impl Surface for WebSurface {
    fn exists(&self, target: &Target) -> bool {
        self.element(target).is_some()
    }

    fn has_class(&self, target: &Target, class: &str) -> bool {
        self.element(target)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn add_class(&mut self, target: &Target, class: &str) {
        if let Some(element) = self.element(target) {
            log_js(element.class_list().add_1(class), "add_class");
        }
    }

    fn remove_class(&mut self, target: &Target, class: &str) {
        if let Some(element) = self.element(target) {
            log_js(element.class_list().remove_1(class), "remove_class");
        }
    }

    fn set_style(&mut self, target: &Target, property: &str, value: &str) {
        let Some(element) = self.element(target) else {
            return;
        };
        let style = element.style();
        if value.is_empty() {
            log_js(style.remove_property(property).map(drop), "remove_property");
        } else {
            log_js(style.set_property(property, value), "set_property");
        }
    }

    fn set_attribute(&mut self, target: &Target, name: &str, value: &str) {
        if let Some(element) = self.element(target) {
            log_js(element.set_attribute(name, value), "set_attribute");
        }
    }

    fn set_text(&mut self, target: &Target, text: &str) {
        if let Some(element) = self.element(target) {
            element.set_text_content(Some(text));
        }
    }

    fn focus(&mut self, target: &Target) {
        if let Some(element) = self.element(target) {
            log_js(element.focus(), "focus");
        }
    }

    fn focused(&self) -> Option<Target> {
        let active = self.document.active_element()?;
        dom::identify(&self.document, &active)
    }

    fn scroll_into_view(&mut self, target: &Target) {
        if let Some(element) = self.element(target) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(web_sys::ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Center);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        match behavior {
            ScrollBehavior::Instant => {
                self.window.scroll_to_with_x_and_y(0.0, 0.0);
                if let Some(root) = self.document.document_element() {
                    root.set_scroll_top(0);
                }
                if let Some(body) = self.document.body() {
                    body.set_scroll_top(0);
                }
            }
            ScrollBehavior::Smooth => {
                let options = ScrollToOptions::new();
                options.set_top(0.0);
                options.set_behavior(web_sys::ScrollBehavior::Smooth);
                self.window.scroll_to_with_scroll_to_options(&options);
            }
        }
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }

    fn push_fragment(&mut self, fragment: &str) {
        match self.window.history() {
            Ok(history) => log_js(
                history.push_state_with_url(&JsValue::NULL, "", Some(format!("#{fragment}").as_str())),
                "push_state",
            ),
            Err(err) => debug!(?err, "surface: history unavailable"),
        }
    }

    fn observe(&mut self, section: Section, target: &Target, options: ObserveOptions) {
        let Some(element) = self.element(target) else {
            return;
        };
        let runtime = self.runtime.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let intersecting = entries.iter().any(|entry| {
                    entry
                        .dyn_into::<IntersectionObserverEntry>()
                        .is_ok_and(|entry| entry.is_intersecting())
                });
                if !intersecting {
                    return;
                }
                if let Some(runtime) = runtime.upgrade() {
                    runtime.submit(UiInput::Intersected { section });
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin());
        let observer = match IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(observer) => observer,
            Err(err) => {
                debug!(?err, ?section, "surface: IntersectionObserver unavailable");
                return;
            }
        };
        observer.observe(&element);
        self.observers.insert(
            section,
            Observer {
                observer,
                _callback: callback,
            },
        );
    }

    fn unobserve(&mut self, section: Section) {
        self.observers.remove(&section);
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        self.arm(delay, timer, false)
    }

    fn schedule_repeating(&mut self, period: Duration, timer: Timer) -> TimerHandle {
        self.arm(period, timer, true)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.timers().borrow_mut().release(handle);
        }
    }

    fn after_transition(&mut self, target: &Target, fallback: Duration, timer: Timer) -> TimerHandle {
        let Some(element) = self.element(target) else {
            return self.schedule(fallback, timer);
        };
        let Some(runtime) = self.runtime.upgrade() else {
            return TimerHandle(0);
        };
        let mut timers = runtime.timers().borrow_mut();
        let handle = timers.allocate();

        let weak = self.runtime.clone();
        let on_end = timer.clone();
        let watched = JsValue::from(element.clone());
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if ends_fade(&event, &watched) {
                fire(&weak, handle, &on_end, false);
            }
        });
        let fallback_callback = self.timer_callback(handle, timer, false);
        let millis = i32::try_from(fallback.as_millis()).unwrap_or(i32::MAX);

        let fallback_id = match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            fallback_callback.as_ref().unchecked_ref(),
            millis,
        ) {
            Ok(id) => id,
            Err(err) => {
                debug!(?err, "surface: arming transition fallback failed");
                return handle;
            }
        };
        log_js(
            element.add_event_listener_with_callback(TRANSITION_END, listener.as_ref().unchecked_ref()),
            "add transitionend listener",
        );
        timers.insert(
            handle,
            Entry::Transition {
                element,
                listener,
                fallback_id,
                _fallback: fallback_callback,
            },
        );
        handle
    }
}
