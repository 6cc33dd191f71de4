use log::error;
use rocket::http::{CookieJar, Status};
use rocket::response::Redirect;
use rocket::{Route, State};
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use crate::config::FolioConfig;
use crate::i18n::TranslationStore;
use crate::models::catalog::{Catalog, CatalogStore};
use crate::portfolio::{select_featured, Filter, GridView, SearchFilter};
use crate::prefs::{Lang, Preferences, Theme};
use crate::render;

pub fn routes() -> Vec<Route> {
    routes![homepage, portfolio, set_theme, set_lang]
}

/// Catalog or an empty one. A failed load renders no content.
pub(crate) fn catalog_or_empty(store: &CatalogStore) -> std::sync::Arc<Catalog> {
    store.get().unwrap_or_else(|e| {
        error!("Rendering without projects: {}", e);
        Default::default()
    })
}

/// Values shared by every page shell.
fn page_context(config: &FolioConfig, prefs: Preferences, path: &str) -> Value {
    let languages: Vec<Value> = Lang::ALL
        .iter()
        .filter(|l| config.supports(**l))
        .map(|l| {
            json!({
                "code": l.code(),
                "label": language_label(*l),
                "active": *l == prefs.lang,
            })
        })
        .collect();

    json!({
        "lang": prefs.lang.code(),
        "theme": prefs.theme.name(),
        "other_theme": prefs.theme.toggle().name(),
        "languages": languages,
        "path": path,
        "next": url::form_urlencoded::byte_serialize(path.as_bytes()).collect::<String>(),
    })
}

fn language_label(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "English",
        Lang::Fr => "Français",
        Lang::Es => "Español",
        Lang::Zh => "中文",
    }
}

// ── Pages ──────────────────────────────────────────────

#[get("/")]
pub fn homepage(
    catalog: &State<CatalogStore>,
    translations: &State<TranslationStore>,
    config: &State<FolioConfig>,
    prefs: Preferences,
) -> Template {
    let catalog = catalog_or_empty(catalog);
    let table = translations.table(prefs.lang);
    let featured = select_featured(&catalog, config.featured_count, &mut rand::thread_rng());

    let mut context = page_context(config, prefs, "/");
    context["page"] = json!("home");
    context["featured"] = json!(render::render_featured(&featured, prefs.lang, &table));

    Template::render("home", context)
}

#[get("/portfolio?<filter>&<search>")]
pub fn portfolio(
    filter: Option<&str>,
    search: Option<&str>,
    catalog: &State<CatalogStore>,
    translations: &State<TranslationStore>,
    config: &State<FolioConfig>,
    prefs: Preferences,
) -> Template {
    let catalog = catalog_or_empty(catalog);
    let table = translations.table(prefs.lang);
    let timings = config.timings();

    let mut view = GridView::new(&catalog, prefs.lang, timings).with_search(SearchFilter::parse(search));
    view.select(Filter::parse(filter));

    let path = render::portfolio_url(view.filter().active().key(), view.search().map(|s| s.term()));
    let mut context = page_context(config, prefs, &path);
    context["page"] = json!("portfolio");
    context["active_filter"] = json!(render::filter_label(view.filter().active(), &view));
    context["filters"] = json!(render::render_filter_bar(&view, &table));
    context["grid"] = json!(render::render_grid(&view, &table, timings));

    Template::render("portfolio", context)
}

// ── Preferences ────────────────────────────────────────

/// Only same-site paths are accepted as redirect targets.
fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n.to_string(),
        _ => "/".to_string(),
    }
}

#[get("/prefs/theme/<theme>?<next>")]
pub fn set_theme(
    theme: &str,
    next: Option<&str>,
    cookies: &CookieJar<'_>,
    config: &State<FolioConfig>,
    prefs: Preferences,
) -> Result<Redirect, Status> {
    let theme = match theme {
        "toggle" => prefs.theme.toggle(),
        other => Theme::from_name(other).ok_or(Status::NotFound)?,
    };
    Preferences::set_theme(cookies, theme, config);
    Ok(Redirect::to(safe_next(next)))
}

#[get("/prefs/lang/<code>?<next>")]
pub fn set_lang(
    code: &str,
    next: Option<&str>,
    cookies: &CookieJar<'_>,
    config: &State<FolioConfig>,
) -> Result<Redirect, Status> {
    let lang = Lang::from_code(code)
        .filter(|l| config.supports(*l))
        .ok_or(Status::NotFound)?;
    Preferences::set_lang(cookies, lang, config);
    Ok(Redirect::to(safe_next(next)))
}
