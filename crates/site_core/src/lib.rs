//! View-state coordination for the showcase site.
//!
//! Components never touch the DOM directly: they mutate a [`Surface`] and
//! receive their delayed continuations back as [`UiInput::Timer`] inputs.
//! [`Site`] owns every component and is the single entry point for drivers.

pub mod accordion;
pub mod bus;
pub mod carousel;
pub mod config;
pub mod layout;
pub mod memory;
pub mod nav;
pub mod roadmap;
pub mod router;
pub mod site;
pub mod solutions;
pub mod surface;

pub use bus::{ActivePage, PageAware, PageChange};
pub use config::SiteConfig;
pub use layout::SiteLayout;
pub use memory::MemorySurface;
pub use shared::protocol::UiInput;
pub use site::{Dispatch, Site};
pub use surface::{ObserveOptions, Surface, TimerHandle};

#[cfg(test)]
#[path = "tests/site_tests.rs"]
mod site_tests;

#[cfg(test)]
#[path = "tests/carousel_tests.rs"]
mod carousel_tests;

#[cfg(test)]
#[path = "tests/components_tests.rs"]
mod components_tests;
