//! Translation tables and the `data-i18n` rewrite.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, RwLock};

use log::{error, info};
use regex::{Captures, Regex};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Request, Response};
use serde_json::Value;

use crate::prefs::{self, Lang};
use crate::render::html_escape;

/// One language's strings. Arbitrarily nested; leaves are strings.
#[derive(Debug, Clone, Default)]
pub struct Table(Value);

impl Table {
    pub fn new(value: Value) -> Self {
        Table(value)
    }

    pub fn empty() -> Self {
        Table(Value::Object(Default::default()))
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        if !value.is_object() {
            return Err("translation root must be an object".to_string());
        }
        Ok(Table::new(value))
    }

    /// Walk `portfolio.filterAll`-style keys. `None` on any missing segment
    /// or when the key lands on a nested table instead of a string.
    pub fn resolve(&self, dotted_key: &str) -> Option<&str> {
        dotted_key
            .split('.')
            .try_fold(&self.0, |node, segment| node.get(segment))?
            .as_str()
    }

    pub fn t(&self, key: &str, default: &str) -> String {
        self.resolve(key).unwrap_or(default).to_string()
    }
}

/// Loads `<dir>/<lang>.json` on first use and keeps one table per language.
pub struct TranslationStore {
    dir: PathBuf,
    tables: RwLock<HashMap<Lang, Arc<Table>>>,
}

impl TranslationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        TranslationStore {
            dir: dir.into(),
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn path_for(&self, lang: Lang) -> PathBuf {
        self.dir.join(format!("{}.json", lang.code()))
    }

    pub fn load(&self, lang: Lang) -> Result<Table, String> {
        read_table(&self.path_for(lang))
    }

    /// Cached table for `lang`, loading it if needed. A failed first load is
    /// logged once and caches an empty table, so every lookup takes its
    /// literal default until `reload` succeeds.
    pub fn table(&self, lang: Lang) -> Arc<Table> {
        if let Some(t) = self.tables.read().ok().and_then(|m| m.get(&lang).cloned()) {
            return t;
        }
        match self.reload(lang) {
            Ok(t) => t,
            Err(_) => {
                let empty = Arc::new(Table::empty());
                match self.tables.write() {
                    Ok(mut tables) => tables.entry(lang).or_insert(empty).clone(),
                    Err(_) => empty,
                }
            }
        }
    }

    /// Re-read `lang` from disk. On success the cached table is replaced
    /// wholesale; on failure the previous table (if any) stays in place.
    pub fn reload(&self, lang: Lang) -> Result<Arc<Table>, String> {
        match self.load(lang) {
            Ok(table) => {
                let table = Arc::new(table);
                if let Ok(mut tables) = self.tables.write() {
                    tables.insert(lang, table.clone());
                }
                info!("Loaded translations for {}", lang);
                Ok(table)
            }
            Err(e) => {
                error!("Failed to load translations for {}: {}", lang, e);
                Err(e)
            }
        }
    }
}

fn read_table(path: &Path) -> Result<Table, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Table::parse(&raw).map_err(|e| format!("{}: {}", path.display(), e))
}

static I18N_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<[a-zA-Z][a-zA-Z0-9-]*\b[^>]*?\sdata-i18n="([^"]+)"[^>]*>)([^<]*)"#)
        .expect("valid data-i18n pattern")
});

/// Replace the text of every `data-i18n="key"` element with the table's string.
/// Keys the table lacks keep their current text, which acts as the default.
pub fn apply_all(html: &str, table: &Table) -> String {
    I18N_ELEMENT
        .replace_all(html, |caps: &Captures| match table.resolve(&caps[2]) {
            Some(text) => format!("{}{}", &caps[1], html_escape(text)),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Rewrites `data-i18n` elements of every HTML response in the visitor's language.
pub struct TranslateFairing;

#[rocket::async_trait]
impl Fairing for TranslateFairing {
    fn info(&self) -> Info {
        Info {
            name: "data-i18n Rewriter",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let is_html = res.content_type().map(|ct| ct.is_html()).unwrap_or(false);
        if !is_html || req.uri().path().starts_with("/static") {
            return;
        }
        let store = match req.rocket().state::<TranslationStore>() {
            Some(s) => s,
            None => return,
        };

        let lang = prefs::preferences_for(req).lang;
        let body = match res.body_mut().to_string().await {
            Ok(b) => b,
            Err(e) => {
                error!("Could not read response body for translation: {}", e);
                return;
            }
        };
        let translated = apply_all(&body, &store.table(lang));
        res.set_sized_body(translated.len(), std::io::Cursor::new(translated));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> Table {
        Table::new(json!({
            "nav": { "portfolio": "Projets" },
            "portfolio": { "filterAll": "Tous", "viewLive": "Voir en ligne" }
        }))
    }

    #[test]
    fn resolve_walks_nested_keys() {
        let t = table();
        assert_eq!(t.resolve("portfolio.filterAll"), Some("Tous"));
        assert_eq!(t.resolve("nav.home"), None);
        assert_eq!(t.resolve("nav"), None);
        assert_eq!(t.resolve("portfolio.filterAll.extra"), None);
        assert_eq!(t.t("nav.home", "Home"), "Home");
    }

    #[test]
    fn apply_all_rewrites_known_keys_only() {
        let html = r#"<nav><a href="/" data-i18n="nav.home">Home</a> <a class="x" data-i18n="nav.portfolio" href="/portfolio">Portfolio</a></nav>"#;
        let out = apply_all(html, &table());
        assert!(out.contains(r#"data-i18n="nav.home">Home</a>"#));
        assert!(out.contains(r#"href="/portfolio">Projets</a>"#));
    }

    #[test]
    fn apply_all_escapes_translated_text() {
        let t = Table::new(json!({ "a": "<b>&" }));
        let out = apply_all(r#"<span data-i18n="a">x</span>"#, &t);
        assert_eq!(out, r#"<span data-i18n="a">&lt;b&gt;&amp;</span>"#);
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(Table::parse("[1, 2]").is_err());
        assert!(Table::parse("{ nope").is_err());
        assert!(Table::parse(r#"{"a": "b"}"#).is_ok());
    }
}
