use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::prefs::Lang;

/// Language code -> string. The `en` entry is the fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized(BTreeMap<String, String>);

impl Localized {
    #[cfg(test)]
    pub fn new<K: Into<String>, V: Into<String>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Localized(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The string for `lang`, else English, else empty.
    pub fn get(&self, lang: Lang) -> &str {
        self.0
            .get(lang.code())
            .or_else(|| self.0.get(Lang::En.code()))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn english(&self) -> &str {
        self.get(Lang::En)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    #[default]
    Web,
    ImageGallery,
    Video,
    Pdf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Card id, unique across the catalog. Assigned at load when absent.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectKind,
    #[serde(default)]
    pub title: Localized,
    #[serde(default)]
    pub description: Localized,
    #[serde(default)]
    pub images: Vec<String>,
    /// Video or PDF source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// PDF preview image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// External URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Project {
    #[cfg(test)]
    pub fn new(kind: ProjectKind, title_en: &str) -> Self {
        Project {
            id: String::new(),
            kind,
            title: Localized::new([("en", title_en)]),
            description: Localized::default(),
            images: Vec::new(),
            src: None,
            image: None,
            link: None,
        }
    }
}
