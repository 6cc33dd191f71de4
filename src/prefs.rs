//! Visitor preferences: visual theme and active language.
//! Persisted as two plain cookies (`theme`, `lang`) with an explicit expiry.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::time::OffsetDateTime;
use serde::{Deserialize, Serialize};

use crate::config::FolioConfig;

pub const THEME_COOKIE: &str = "theme";
pub const LANG_COOKIE: &str = "lang";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Fr,
    Es,
    Zh,
}

impl Lang {
    pub const ALL: [Lang; 4] = [Lang::En, Lang::Fr, Lang::Es, Lang::Zh];

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Fr => "fr",
            Lang::Es => "es",
            Lang::Zh => "zh",
        }
    }

    /// Parse an ISO code. Region subtags are ignored (`fr-CA` -> `fr`).
    pub fn from_code(s: &str) -> Option<Self> {
        let base = s.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        Lang::ALL.into_iter().find(|l| l.code() == base)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Somewhere preferences can be persisted with an expiry.
pub trait PreferenceBackend {
    fn read(&self, name: &str) -> Option<String>;
    fn write(&self, name: &str, value: &str, expires_at: DateTime<Utc>);

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Read a preference. Never fails; absence is `None`.
pub fn get(backend: &impl PreferenceBackend, name: &str) -> Option<String> {
    backend.read(name)
}

/// Write a preference expiring `ttl_days` from now.
pub fn set(backend: &impl PreferenceBackend, name: &str, value: &str, ttl_days: i64) {
    let expires_at = backend.now() + Duration::days(ttl_days);
    backend.write(name, value, expires_at);
}

impl PreferenceBackend for CookieJar<'_> {
    fn read(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value().to_string())
    }

    fn write(&self, name: &str, value: &str, expires_at: DateTime<Utc>) {
        let mut cookie = Cookie::new(name.to_string(), value.to_string());
        cookie.set_path("/");
        cookie.set_same_site(SameSite::Lax);
        if let Ok(at) = OffsetDateTime::from_unix_timestamp(expires_at.timestamp()) {
            cookie.set_expires(at);
        }
        self.add(cookie);
    }
}

#[cfg(test)]
pub use memory::MemoryPrefs;


/// The active theme and language for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub theme: Theme,
    pub lang: Lang,
}

impl Preferences {
    /// Resolve from persisted values, falling back to the configured defaults
    /// for missing, unknown, or disabled values.
    pub fn resolve(backend: &impl PreferenceBackend, config: &FolioConfig) -> Self {
        let theme = get(backend, THEME_COOKIE)
            .and_then(|v| Theme::from_name(&v))
            .unwrap_or(config.default_theme);
        let lang = get(backend, LANG_COOKIE)
            .and_then(|v| Lang::from_code(&v))
            .filter(|l| config.supports(*l))
            .unwrap_or(config.default_lang);
        Preferences { theme, lang }
    }

    pub fn set_theme(backend: &impl PreferenceBackend, theme: Theme, config: &FolioConfig) {
        set(backend, THEME_COOKIE, theme.name(), config.pref_ttl_days);
    }

    pub fn set_lang(backend: &impl PreferenceBackend, lang: Lang, config: &FolioConfig) {
        set(backend, LANG_COOKIE, lang.code(), config.pref_ttl_days);
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Preferences {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(preferences_for(request))
    }
}

/// Preferences for a request outside a route (fairings).
pub fn preferences_for(request: &Request<'_>) -> Preferences {
    let default_config = FolioConfig::default();
    let config = request
        .rocket()
        .state::<FolioConfig>()
        .unwrap_or(&default_config);
    Preferences::resolve(request.cookies(), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_codes_ignore_region_and_case() {
        assert_eq!(Lang::from_code("fr-CA"), Some(Lang::Fr));
        assert_eq!(Lang::from_code("ZH_hans"), Some(Lang::Zh));
        assert_eq!(Lang::from_code("de"), None);
        assert_eq!(Lang::from_code(""), None);
    }

    #[test]
    fn theme_toggle_flips() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle().toggle(), Theme::Light);
        assert_eq!(Theme::from_name(" Light "), Some(Theme::Light));
        assert_eq!(Theme::from_name("sepia"), None);
    }

    #[test]
    fn disabled_language_falls_back() {
        let config = FolioConfig {
            languages: vec!["en".into(), "fr".into()],
            ..FolioConfig::default()
        };
        let store = MemoryPrefs::new(Utc::now());
        set(&store, LANG_COOKIE, "zh", 30);
        assert_eq!(Preferences::resolve(&store, &config).lang, Lang::En);
        set(&store, LANG_COOKIE, "fr", 30);
        assert_eq!(Preferences::resolve(&store, &config).lang, Lang::Fr);
    }
}
