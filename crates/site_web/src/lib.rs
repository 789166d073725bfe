//! Browser driver: binds the site's components to the live document.

mod app;
mod config;
mod dom;
mod listeners;
mod logging;
mod surface;
mod timers;

#[cfg(all(test, target_arch = "wasm32"))]
#[path = "tests/fixture.rs"]
mod fixture;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

use std::{cell::RefCell, rc::Rc};

use tracing::{error, info};
use wasm_bindgen::{prelude::*, JsCast};

use crate::app::Runtime;

thread_local! {
    static APP: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logging::init();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let boot = Closure::once_into_js(mount);
        document.add_event_listener_with_callback("DOMContentLoaded", boot.unchecked_ref())?;
    } else {
        mount();
    }
    Ok(())
}

/// Removes every listener, timer and observer the driver installed.
#[wasm_bindgen]
pub fn unmount() {
    let dropped = APP.with(|slot| slot.borrow_mut().take()).is_some();
    if dropped {
        info!("site_web: unmounted");
    }
}

fn mount() {
    match app::boot() {
        Ok(runtime) => APP.with(|slot| *slot.borrow_mut() = Some(runtime)),
        Err(err) => error!("site_web: boot failed: {err:#}"),
    }
}

pub(crate) fn js_error(value: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{value:?}")
}
