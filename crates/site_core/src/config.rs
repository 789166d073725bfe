use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::{
    domain::{PageId, ProductCatalog},
    error::SiteError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub home_page: PageId,
    pub mobile_breakpoint_px: f64,
    pub swipe_threshold_px: f64,
    pub pages: ComponentPages,
    pub navbar: NavbarConfig,
    pub observers: ObserverConfig,
    pub timings: Timings,
    pub products: ProductCatalog,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            home_page: PageId::from("home"),
            mobile_breakpoint_px: 768.0,
            swipe_threshold_px: 50.0,
            pages: ComponentPages::default(),
            navbar: NavbarConfig::default(),
            observers: ObserverConfig::default(),
            timings: Timings::default(),
            products: ProductCatalog::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, SiteError> {
        let config: Self =
            toml::from_str(raw).map_err(|err| SiteError::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SiteError> {
        if self.products.is_empty() {
            return Err(SiteError::EmptyCatalog);
        }
        if self.home_page.as_str().is_empty() {
            return Err(SiteError::invalid_config("home_page must not be empty"));
        }
        if self.timings.autoplay_interval_ms == 0 {
            return Err(SiteError::invalid_config(
                "timings.autoplay_interval_ms must be positive",
            ));
        }
        if self.swipe_threshold_px < 0.0 {
            return Err(SiteError::invalid_config(
                "swipe_threshold_px must not be negative",
            ));
        }
        for (name, threshold) in [
            ("roadmap", self.observers.roadmap_threshold),
            ("gallery", self.observers.gallery_threshold),
            ("construction", self.observers.construction_threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(SiteError::invalid_config(format!(
                    "observers.{name}_threshold must be within [0, 1], got {threshold}"
                )));
            }
        }
        Ok(())
    }
}

/// Page that must be active for each component's keyboard and autoplay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentPages {
    pub solutions: PageId,
    pub roadmap: PageId,
    pub carousel: PageId,
    pub accordion: PageId,
}

impl Default for ComponentPages {
    fn default() -> Self {
        Self {
            solutions: PageId::from("solutions"),
            roadmap: PageId::from("roadmap"),
            carousel: PageId::from("operations"),
            accordion: PageId::from("about"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    pub hide_after_px: f64,
    pub solid_after_px: f64,
    pub solid_background: String,
    pub translucent_background: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            hide_after_px: 100.0,
            solid_after_px: 50.0,
            solid_background: "rgba(247, 247, 247, 0.98)".into(),
            translucent_background: "rgba(247, 247, 247, 0.95)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub roadmap_threshold: f64,
    pub gallery_threshold: f64,
    pub construction_threshold: f64,
    pub bottom_margin_px: u32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            roadmap_threshold: 0.3,
            gallery_threshold: 0.3,
            construction_threshold: 0.2,
            bottom_margin_px: 50,
        }
    }
}

/// Every delay the components use, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub home_scroll_recheck_ms: u64,
    pub load_scroll_reset_ms: u64,
    pub solution_fade_out_ms: u64,
    pub solution_fade_in_ms: u64,
    pub step_press_ms: u64,
    pub carousel_dim_ms: u64,
    pub carousel_settle_ms: u64,
    pub autoplay_interval_ms: u64,
    pub pointer_resume_ms: u64,
    pub touch_resume_ms: u64,
    pub visibility_resume_ms: u64,
    pub nav_resume_ms: u64,
    pub gallery_entrance_ms: u64,
    pub gallery_autoplay_ms: u64,
    pub stagger_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            home_scroll_recheck_ms: 50,
            load_scroll_reset_ms: 100,
            solution_fade_out_ms: 300,
            solution_fade_in_ms: 50,
            step_press_ms: 150,
            carousel_dim_ms: 150,
            carousel_settle_ms: 100,
            autoplay_interval_ms: 3000,
            pointer_resume_ms: 500,
            touch_resume_ms: 2000,
            visibility_resume_ms: 500,
            nav_resume_ms: 500,
            gallery_entrance_ms: 200,
            gallery_autoplay_ms: 1000,
            stagger_ms: 100,
        }
    }
}

impl Timings {
    /// Overrides one timing by its field name. Returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: u64) -> bool {
        let slot = match key {
            "home_scroll_recheck_ms" => &mut self.home_scroll_recheck_ms,
            "load_scroll_reset_ms" => &mut self.load_scroll_reset_ms,
            "solution_fade_out_ms" => &mut self.solution_fade_out_ms,
            "solution_fade_in_ms" => &mut self.solution_fade_in_ms,
            "step_press_ms" => &mut self.step_press_ms,
            "carousel_dim_ms" => &mut self.carousel_dim_ms,
            "carousel_settle_ms" => &mut self.carousel_settle_ms,
            "autoplay_interval_ms" => &mut self.autoplay_interval_ms,
            "pointer_resume_ms" => &mut self.pointer_resume_ms,
            "touch_resume_ms" => &mut self.touch_resume_ms,
            "visibility_resume_ms" => &mut self.visibility_resume_ms,
            "nav_resume_ms" => &mut self.nav_resume_ms,
            "gallery_entrance_ms" => &mut self.gallery_entrance_ms,
            "gallery_autoplay_ms" => &mut self.gallery_autoplay_ms,
            "stagger_ms" => &mut self.stagger_ms,
            _ => return false,
        };
        *slot = value;
        true
    }
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}
