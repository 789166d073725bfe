//! Scripted, headless runs of the site against `MemorySurface`.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::domain::PageId;
use site_core::{
    memory::{JournalEntry, SurfaceSnapshot},
    MemorySurface, Site, SiteConfig, SiteLayout, UiInput,
};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Input { input: UiInput },
    Wait { wait_ms: u64 },
}

/// A run description: the markup to simulate, the URL fragment at load, the
/// viewport width and the steps to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "SiteLayout::standard")]
    pub layout: SiteLayout,
    #[serde(default)]
    pub fragment: Option<String>,
    #[serde(default)]
    pub viewport_width: Option<f64>,
    pub steps: Vec<Step>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptFile {
    Steps(Vec<Step>),
    Full(Script),
}

impl Script {
    /// Accepts either a bare array of steps or a full script object.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let file: ScriptFile = serde_json::from_str(raw).context("parsing script")?;
        Ok(match file {
            ScriptFile::Steps(steps) => Self {
                layout: SiteLayout::standard(),
                fragment: None,
                viewport_width: None,
                steps,
            },
            ScriptFile::Full(script) => script,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Timers fire as soon as the virtual clock passes them.
    Virtual,
    /// Waits sleep on the tokio clock until each timer is due.
    Realtime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub active_page: Option<PageId>,
    pub carousel_index: Option<usize>,
    pub carousel_autoplaying: bool,
    pub inputs: usize,
    pub prevented: usize,
    pub timers_fired: usize,
    pub surface: SurfaceSnapshot,
}

pub struct Simulation {
    site: Site,
    surface: MemorySurface,
    inputs: usize,
    prevented: usize,
    timers_fired: usize,
}

impl Simulation {
    pub fn mount(script: &Script, config: SiteConfig) -> anyhow::Result<Self> {
        let mut surface = MemorySurface::for_layout(&script.layout);
        if let Some(width) = script.viewport_width {
            surface.set_viewport_width(width);
        }
        let site = Site::mount(&script.layout, config, script.fragment.as_deref(), &mut surface)
            .context("mounting site")?;
        Ok(Self {
            site,
            surface,
            inputs: 0,
            prevented: 0,
            timers_fired: 0,
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn surface(&self) -> &MemorySurface {
        &self.surface
    }

    pub fn journal(&self) -> &[JournalEntry] {
        self.surface.journal()
    }

    pub async fn run(&mut self, steps: &[Step], pace: Pace) {
        for step in steps {
            match step {
                Step::Input { input } => self.input(input.clone()),
                Step::Wait { wait_ms } => self.wait(Duration::from_millis(*wait_ms), pace).await,
            }
        }
        info!(
            inputs = self.inputs,
            timers = self.timers_fired,
            now_ms = self.surface.now().as_millis() as u64,
            "sim: script finished"
        );
    }

    fn input(&mut self, input: UiInput) {
        let name = input.name();
        let dispatch = self.site.dispatch(input, &mut self.surface);
        self.inputs += 1;
        if dispatch.prevent_default {
            self.prevented += 1;
        }
        debug!(input = name, prevent_default = dispatch.prevent_default, "sim: input");
    }

    async fn wait(&mut self, by: Duration, pace: Pace) {
        match pace {
            Pace::Virtual => {
                self.timers_fired += self.surface.advance(&mut self.site, by);
            }
            Pace::Realtime => {
                let until = self.surface.now() + by;
                while let Some(due) = self.surface.next_due().filter(|due| *due <= until) {
                    self.sleep_until(due).await;
                }
                self.sleep_until(until).await;
            }
        }
    }

    async fn sleep_until(&mut self, at: Duration) {
        let gap = at.saturating_sub(self.surface.now());
        tokio::time::sleep(gap).await;
        self.timers_fired += self.surface.advance(&mut self.site, gap);
    }

    pub fn report(&self) -> Report {
        let carousel = self.site.carousel();
        Report {
            active_page: self.site.active_page().cloned(),
            carousel_index: carousel.map(|c| c.current()),
            carousel_autoplaying: carousel.is_some_and(|c| c.is_autoplaying()),
            inputs: self.inputs,
            prevented: self.prevented,
            timers_fired: self.timers_fired,
            surface: self.surface.snapshot(),
        }
    }
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;
