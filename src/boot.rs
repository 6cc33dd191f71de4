use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::FolioConfig;
use crate::prefs::Lang;

/// Required directories that will be created if missing
const REQUIRED_DIRS: &[&str] = &[
    "website",
    "website/static",
    "website/static/css",
    "website/static/js",
    "website/templates",
];

/// Page shells — every page 500s without these
const CRITICAL_TEMPLATES: &[&str] = &[
    "website/templates/base.html.tera",
    "website/templates/home.html.tera",
    "website/templates/portfolio.html.tera",
];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing files, and
/// aborts if critical dependencies are absent.
pub fn run(config: &FolioConfig) {
    info!("Folio boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS.iter().copied().chain([config.i18n_dir.as_str()]) {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Templates ───────────────────────────────────
    for file in CRITICAL_TEMPLATES {
        if !Path::new(file).exists() {
            error!("  MISSING critical template: {}", file);
            errors += 1;
        }
    }

    // ── 3. Catalog ─────────────────────────────────────
    if !Path::new(&config.catalog_path).is_file() {
        error!("  MISSING project catalog: {}", config.catalog_path);
        errors += 1;
    }

    // ── 4. Translations ────────────────────────────────
    for lang in Lang::ALL.iter().filter(|l| config.supports(**l)) {
        let file = Path::new(&config.i18n_dir).join(format!("{}.json", lang.code()));
        if !file.is_file() {
            warn!(
                "  Missing translations: {} ({} pages fall back to built-in text)",
                file.display(),
                lang
            );
            warnings += 1;
        }
    }

    // ── 5. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found — using default config");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
