use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use log::{error, info};
use serde::{Deserialize, Serialize};

use super::project::{Localized, Project};

/// A project category. Its `id` is the filter key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Localized,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub themes: Vec<Theme>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { themes: Vec<Theme> },
    Bare(Vec<Theme>),
}

impl Catalog {
    pub fn new(themes: Vec<Theme>) -> Self {
        let mut catalog = Catalog { themes };
        catalog.normalize();
        catalog
    }

    /// Parse `projects.json`: either a bare array of themes or `{ "themes": [...] }`.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let file: CatalogFile = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let themes = match file {
            CatalogFile::Wrapped { themes } | CatalogFile::Bare(themes) => themes,
        };
        Ok(Self::new(themes))
    }

    /// Give every theme and project a unique id. Theme ids default to the
    /// slug of the English title; project ids to `<theme id>-<index>`.
    fn normalize(&mut self) {
        let mut theme_ids = HashSet::new();
        let mut card_ids = HashSet::new();

        for (t_idx, theme) in self.themes.iter_mut().enumerate() {
            let mut base = theme.id.trim().to_string();
            if base.is_empty() {
                base = slug::slugify(theme.title.english());
            }
            if base.is_empty() {
                base = format!("theme-{}", t_idx + 1);
            }
            theme.id = unique_id(base, &mut theme_ids);

            for (p_idx, project) in theme.projects.iter_mut().enumerate() {
                let base = match project.id.trim() {
                    "" => format!("{}-{}", theme.id, p_idx + 1),
                    given => given.to_string(),
                };
                project.id = unique_id(base, &mut card_ids);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.themes.iter().all(|t| t.projects.is_empty())
    }

    pub fn len(&self) -> usize {
        self.themes.iter().map(|t| t.projects.len()).sum()
    }

    /// Every project with its owning theme, in catalog order.
    pub fn flatten(&self) -> impl Iterator<Item = (&Theme, &Project)> {
        self.themes
            .iter()
            .flat_map(|t| t.projects.iter().map(move |p| (t, p)))
    }

    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn find(&self, card_id: &str) -> Option<(&Theme, &Project)> {
        self.flatten().find(|(_, p)| p.id == card_id)
    }
}

fn unique_id(base: String, seen: &mut HashSet<String>) -> String {
    let mut id = base.clone();
    let mut n = 2;
    while !seen.insert(id.clone()) {
        id = format!("{}-{}", base, n);
        n += 1;
    }
    id
}

/// Reads the catalog once per server instance. The outcome, success or
/// failure, is kept for the lifetime of the store.
pub struct CatalogStore {
    path: PathBuf,
    cell: OnceLock<Result<Arc<Catalog>, String>>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CatalogStore {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<Arc<Catalog>, String> {
        self.cell.get_or_init(|| self.load()).clone()
    }

    fn load(&self) -> Result<Arc<Catalog>, String> {
        let result = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|raw| Catalog::from_json(&raw));
        match result {
            Ok(catalog) => {
                info!(
                    "Loaded catalog: {} themes, {} projects",
                    catalog.themes.len(),
                    catalog.len()
                );
                Ok(Arc::new(catalog))
            }
            Err(e) => {
                error!("Failed to load catalog {}: {}", self.path.display(), e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_derived_and_unique() {
        let raw = r#"{ "themes": [
            { "title": { "en": "Web Apps" }, "projects": [ { "type": "web" }, { "type": "web" } ] },
            { "id": "web-apps", "title": { "en": "More" }, "projects": [ { "id": "web-apps-1", "type": "pdf" } ] },
            { "title": {}, "projects": [] }
        ] }"#;
        let catalog = Catalog::from_json(raw).unwrap();
        let ids: Vec<&str> = catalog.themes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["web-apps", "web-apps-2", "theme-3"]);
        let cards: Vec<&str> = catalog.flatten().map(|(_, p)| p.id.as_str()).collect();
        assert_eq!(cards, ["web-apps-1", "web-apps-2", "web-apps-1-2"]);
    }

    #[test]
    fn bare_array_is_accepted() {
        let raw = r#"[ { "id": "design", "title": { "en": "Design" }, "projects": [
            { "type": "image-gallery", "title": { "en": "Posters" }, "images": ["a.jpg", "b.jpg"] }
        ] } ]"#;
        let catalog = Catalog::from_json(raw).unwrap();
        assert_eq!(catalog.len(), 1);
        let (theme, project) = catalog.find("design-1").unwrap();
        assert_eq!(theme.id, "design");
        assert_eq!(project.images.len(), 2);
    }

    #[test]
    fn missing_file_is_remembered() {
        let store = CatalogStore::new("does/not/exist.json");
        assert!(store.get().is_err());
        assert!(store.get().is_err());
    }
}
