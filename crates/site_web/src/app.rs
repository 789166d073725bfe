//! Runtime wiring: one `Site`, one `WebSurface`, and a queue between the
//! browser callbacks and the dispatcher.

use std::{cell::RefCell, rc::Rc};

use anyhow::Context;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use site_core::{Dispatch, Site, SiteConfig, SiteLayout, UiInput};
use tracing::{debug, info, warn};
use web_sys::{Document, Window};

use crate::{config, dom, listeners::Listeners, surface::WebSurface, timers::Timers};

const INPUT_QUEUE_CAPACITY: usize = 256;

pub struct Runtime {
    input_tx: Sender<UiInput>,
    input_rx: Receiver<UiInput>,
    site: RefCell<Option<Site>>,
    surface: RefCell<WebSurface>,
    timers: RefCell<Timers>,
    listeners: RefCell<Listeners>,
}

impl Runtime {
    pub fn timers(&self) -> &RefCell<Timers> {
        &self.timers
    }

    /// Queues `input` and drains the queue unless a dispatch is already in
    /// progress further up the stack, in which case that pump picks it up.
    ///
    /// The returned `Dispatch` belongs to `input` only when it was drained
    /// here; a queued input cannot cancel its DOM default action.
    pub fn submit(&self, input: UiInput) -> Dispatch {
        let name = input.name();
        match self.input_tx.try_send(input) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(input = name, "runtime: input queue is full; dropping");
                return Dispatch::default();
            }
            Err(TrySendError::Disconnected(_)) => return Dispatch::default(),
        }
        self.pump()
    }

    fn pump(&self) -> Dispatch {
        let Ok(mut site) = self.site.try_borrow_mut() else {
            debug!("runtime: input queued behind running dispatch");
            return Dispatch::default();
        };
        let Some(site) = site.as_mut() else {
            return Dispatch::default();
        };
        let Ok(mut surface) = self.surface.try_borrow_mut() else {
            return Dispatch::default();
        };

        let mut first = None;
        while let Ok(input) = self.input_rx.try_recv() {
            let dispatch = site.dispatch(input, &mut *surface);
            first.get_or_insert(dispatch);
        }
        first.unwrap_or_default()
    }

    pub fn new(window: &Window, document: &Document) -> Rc<Self> {
        let (input_tx, input_rx) = bounded(INPUT_QUEUE_CAPACITY);
        Rc::new_cyclic(|weak| Self {
            input_tx,
            input_rx,
            site: RefCell::new(None),
            surface: RefCell::new(WebSurface::new(window.clone(), document.clone(), weak.clone())),
            timers: RefCell::new(Timers::new(window.clone())),
            listeners: RefCell::new(Listeners::default()),
        })
    }

    /// Mounts the site against this runtime's surface. Inputs submitted
    /// before this are queued and drained by the first pump after it.
    pub fn mount(
        &self,
        layout: &SiteLayout,
        config: SiteConfig,
        fragment: Option<&str>,
    ) -> anyhow::Result<()> {
        let site = {
            let mut surface = self.surface.borrow_mut();
            Site::mount(layout, config, fragment, &mut *surface).context("mounting site")?
        };
        *self.site.borrow_mut() = Some(site);
        Ok(())
    }
}

pub fn boot() -> anyhow::Result<Rc<Runtime>> {
    let window = web_sys::window().context("no global window")?;
    let document = window.document().context("window has no document")?;

    let config = config::load(&document);
    let layout = dom::discover(&document);
    let runtime = Runtime::new(&window, &document);

    let fragment = window.location().hash().ok();
    runtime.mount(&layout, config, fragment.as_deref())?;

    let listeners = Listeners::attach(&runtime, &window, &document, &layout)?;
    let count = listeners.len();
    *runtime.listeners.borrow_mut() = listeners;

    info!(
        pages = layout.pages.len(),
        listeners = count,
        timers = runtime.timers.borrow().len(),
        "runtime: booted"
    );
    Ok(runtime)
}

#[cfg(all(test, target_arch = "wasm32"))]
#[path = "tests/app_tests.rs"]
mod tests;
