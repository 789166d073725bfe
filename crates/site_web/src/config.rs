use site_core::SiteConfig;
use tracing::{info, warn};
use web_sys::Document;

/// `<script type="application/toml" id="site-config">` holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

/// Reads the inline configuration block; a missing block means defaults and
/// an unreadable one is logged and ignored.
pub fn load(document: &Document) -> SiteConfig {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return SiteConfig::default();
    };
    let raw = element.text_content().unwrap_or_default();
    if raw.trim().is_empty() {
        return SiteConfig::default();
    }

    match SiteConfig::from_toml_str(&raw) {
        Ok(config) => {
            info!("config: loaded inline #{CONFIG_ELEMENT_ID}");
            config
        }
        Err(err) => {
            warn!("config: ignoring inline #{CONFIG_ELEMENT_ID}: {err}");
            SiteConfig::default()
        }
    }
}
