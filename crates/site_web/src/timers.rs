//! Owns every browser timer and transition-end listener the site arms.
//!
//! An entry is released exactly once: by firing (one-shot), by `cancel`, or
//! when the registry is dropped. Releasing clears the browser side too.

use std::collections::HashMap;

use site_core::TimerHandle;
use tracing::debug;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Event, HtmlElement, Window};

pub const TRANSITION_END: &str = "transitionend";
/// The property every phased component fades.
pub const FADED_PROPERTY: &str = "opacity";

pub enum Entry {
    Timeout {
        id: i32,
        _callback: Closure<dyn FnMut()>,
    },
    Interval {
        id: i32,
        _callback: Closure<dyn FnMut()>,
    },
    /// Fires on `transitionend` or the fallback timeout, whichever is first.
    Transition {
        element: HtmlElement,
        listener: Closure<dyn FnMut(Event)>,
        fallback_id: i32,
        _fallback: Closure<dyn FnMut()>,
    },
}

pub struct Timers {
    window: Window,
    next_handle: u64,
    entries: HashMap<u64, Entry>,
}

impl Timers {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_handle: 1,
            entries: HashMap::new(),
        }
    }

    pub fn allocate(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    pub fn insert(&mut self, handle: TimerHandle, entry: Entry) {
        self.entries.insert(handle.0, entry);
    }

    pub fn contains(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle.0)
    }

    /// Removes the entry and clears its browser-side timer. Returns whether it
    /// was still live.
    pub fn release(&mut self, handle: TimerHandle) -> bool {
        match self.entries.remove(&handle.0) {
            Some(entry) => {
                self.clear(&entry);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&self, entry: &Entry) {
        match entry {
            Entry::Timeout { id, .. } => self.window.clear_timeout_with_handle(*id),
            Entry::Interval { id, .. } => self.window.clear_interval_with_handle(*id),
            Entry::Transition {
                element,
                listener,
                fallback_id,
                ..
            } => {
                self.window.clear_timeout_with_handle(*fallback_id);
                if let Err(err) = element.remove_event_listener_with_callback(
                    TRANSITION_END,
                    listener.as_ref().unchecked_ref(),
                ) {
                    debug!(?err, "timers: removing transitionend listener failed");
                }
            }
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        let entries = std::mem::take(&mut self.entries);
        for entry in entries.into_values() {
            self.clear(&entry);
        }
    }
}
