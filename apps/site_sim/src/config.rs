use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use shared::domain::PageId;
use site_core::SiteConfig;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "site.toml";
pub const ENV_PREFIX: &str = "SITE__";

/// Defaults, then the TOML file (explicit path, or `site.toml` when present),
/// then `SITE__*` environment overrides.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<SiteConfig> {
    let mut config = match config_file(explicit)? {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            SiteConfig::from_toml_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SiteConfig::default(),
    };

    apply_env_overrides(&mut config, std::env::vars());
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn config_file(explicit: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }
    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    Ok(fallback.exists().then(|| fallback.to_path_buf()))
}

/// Applies `SITE__HOME_PAGE`, `SITE__SWIPE_THRESHOLD_PX`,
/// `SITE__MOBILE_BREAKPOINT_PX` and `SITE__<TIMING>_MS`. Unparseable or
/// unknown keys are logged and skipped.
pub fn apply_env_overrides(
    config: &mut SiteConfig,
    vars: impl IntoIterator<Item = (String, String)>,
) {
    for (name, value) in vars {
        let Some(key) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let key = key.to_ascii_lowercase();
        let applied = match key.as_str() {
            "home_page" => {
                config.home_page = PageId::new(value.as_str());
                true
            }
            "swipe_threshold_px" => parse_into(&value, &mut config.swipe_threshold_px),
            "mobile_breakpoint_px" => parse_into(&value, &mut config.mobile_breakpoint_px),
            timing => value
                .parse::<u64>()
                .is_ok_and(|millis| config.timings.set(timing, millis)),
        };
        if applied {
            debug!(%name, "config: environment override applied");
        } else {
            warn!(%name, %value, "config: ignoring environment override");
        }
    }
}

fn parse_into(raw: &str, slot: &mut f64) -> bool {
    match raw.parse::<f64>() {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
