use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Route, State};
use serde::Serialize;

use crate::config::FolioConfig;
use crate::models::catalog::{Catalog, CatalogStore};
use crate::models::project::Project;
use crate::portfolio::{select_featured, Filter, GridView, SearchFilter, Transition, Visibility};
use crate::prefs::{Lang, Preferences};
use crate::routes::public::catalog_or_empty;

pub fn routes() -> Vec<Route> {
    routes![catalog, project, portfolio, featured]
}

#[derive(Debug, Serialize)]
pub struct CardSummary {
    pub id: String,
    pub theme: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub lang: Lang,
    pub filter: String,
    pub search: Option<String>,
    pub visible: Vec<CardSummary>,
    /// What changes when moving from `all` to `filter`.
    pub transitions: Vec<Transition>,
}

/// The normalized catalog. 503 when it could not be loaded.
#[get("/catalog")]
pub fn catalog(store: &State<CatalogStore>) -> Result<Json<Catalog>, Status> {
    store
        .get()
        .map(|c| Json((*c).clone()))
        .map_err(|_| Status::ServiceUnavailable)
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub theme: String,
    pub project: Project,
}

#[get("/project/<id>")]
pub fn project(id: &str, store: &State<CatalogStore>) -> Option<Json<ProjectResponse>> {
    let catalog = store.get().ok()?;
    let (theme, project) = catalog.find(id)?;
    Some(Json(ProjectResponse {
        theme: theme.id.clone(),
        project: project.clone(),
    }))
}

fn request_lang(lang: Option<&str>, config: &FolioConfig, prefs: Preferences) -> Lang {
    lang.and_then(Lang::from_code)
        .filter(|l| config.supports(*l))
        .unwrap_or(prefs.lang)
}

#[get("/portfolio?<filter>&<search>&<lang>")]
pub fn portfolio(
    filter: Option<&str>,
    search: Option<&str>,
    lang: Option<&str>,
    store: &State<CatalogStore>,
    config: &State<FolioConfig>,
    prefs: Preferences,
) -> Json<PortfolioResponse> {
    let catalog = catalog_or_empty(store);
    let lang = request_lang(lang, config, prefs);

    let mut view = GridView::new(&catalog, lang, config.timings()).with_search(SearchFilter::parse(search));
    let transitions = view.select(Filter::parse(filter));

    let visible = view
        .cards()
        .into_iter()
        .filter(|c| c.visibility == Visibility::Shown)
        .map(|c| CardSummary {
            id: c.card.to_string(),
            theme: c.theme.to_string(),
            title: c.project.title.get(lang).to_string(),
        })
        .collect();

    Json(PortfolioResponse {
        lang,
        filter: view.filter().active().key().to_string(),
        search: view.search().map(|s| s.term().to_string()),
        visible,
        transitions,
    })
}

#[get("/featured?<count>&<lang>")]
pub fn featured(
    count: Option<usize>,
    lang: Option<&str>,
    store: &State<CatalogStore>,
    config: &State<FolioConfig>,
    prefs: Preferences,
) -> Json<Vec<CardSummary>> {
    let catalog = catalog_or_empty(store);
    let lang = request_lang(lang, config, prefs);
    let count = count.unwrap_or(config.featured_count).min(catalog.len());

    let items = select_featured(&catalog, count, &mut rand::thread_rng())
        .into_iter()
        .map(|(t, p)| CardSummary {
            id: p.id.clone(),
            theme: t.id.clone(),
            title: p.title.get(lang).to_string(),
        })
        .collect();
    Json(items)
}
