use std::time::Duration;

use log::warn;
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

use crate::portfolio::TransitionTimings;
use crate::prefs::{Lang, Theme};

/// Site settings, read from the `folio` table of Rocket's figment
/// (`[default.folio]` in Rocket.toml or `ROCKET_FOLIO={...}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub catalog_path: String,
    pub i18n_dir: String,
    pub languages: Vec<String>,
    pub default_theme: Theme,
    pub default_lang: Lang,
    pub featured_count: usize,
    pub show_delay_ms: u64,
    pub hide_delay_ms: u64,
    pub pref_ttl_days: i64,
}

impl Default for FolioConfig {
    fn default() -> Self {
        FolioConfig {
            catalog_path: "website/data/projects.json".to_string(),
            i18n_dir: "website/i18n".to_string(),
            languages: Lang::ALL.iter().map(|l| l.code().to_string()).collect(),
            default_theme: Theme::Dark,
            default_lang: Lang::En,
            featured_count: 3,
            show_delay_ms: 10,
            hide_delay_ms: 300,
            pref_ttl_days: 365,
        }
    }
}

impl FolioConfig {
    pub fn from_figment(figment: &Figment) -> Self {
        if !figment.contains("folio") {
            return Self::default();
        }
        match figment.extract_inner::<FolioConfig>("folio") {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid [folio] config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Whether `lang` is enabled for this site.
    pub fn supports(&self, lang: Lang) -> bool {
        self.languages.iter().any(|c| c == lang.code())
    }

    pub fn timings(&self) -> TransitionTimings {
        TransitionTimings {
            show_delay: Duration::from_millis(self.show_delay_ms),
            hide_delay: Duration::from_millis(self.hide_delay_ms),
        }
    }
}
