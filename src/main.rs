#[macro_use]
extern crate rocket;

use rocket::figment::Figment;
use rocket::fs::FileServer;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

mod boot;
mod config;
mod i18n;
mod models;
mod portfolio;
mod prefs;
mod render;
mod routes;


use config::FolioConfig;
use i18n::{TranslateFairing, TranslationStore};
use models::catalog::CatalogStore;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p data-i18n=\"errors.notFound\">Page not found.</p><a href='/' data-i18n=\"nav.home\">Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p data-i18n=\"errors.serverError\">Internal server error.</p><a href='/' data-i18n=\"nav.home\">Home</a></body></html>".to_string())
}

/// Assemble the site from a figment. The catalog and translation stores are
/// created here, once per instance, and handed to routes as managed state.
pub fn build(figment: Figment) -> Rocket<Build> {
    let config = FolioConfig::from_figment(&figment);
    let catalog = CatalogStore::new(&config.catalog_path);
    let translations = TranslationStore::new(&config.i18n_dir);
    let i18n_dir = config.i18n_dir.clone();

    rocket::custom(figment)
        .manage(catalog)
        .manage(translations)
        .manage(config)
        .attach(Template::fairing())
        .attach(TranslateFairing)
        .mount("/static", FileServer::from("website/static"))
        .mount("/i18n", FileServer::from(i18n_dir))
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let figment = rocket::Config::figment();

    // Boot check — verify/create directories, validate critical files
    boot::run(&FolioConfig::from_figment(&figment));

    build(figment)
}
