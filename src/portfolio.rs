//! Portfolio view state: carousel position, category filter, search filter,
//! card transitions, and the featured selection.
//!
//! Everything here is plain state. The renderer derives markup from it and the
//! browser script only replays the transitions it describes.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::catalog::{Catalog, Theme};
use crate::models::project::Project;
use crate::prefs::Lang;

pub const ALL_FILTER: &str = "all";

// ── Carousel ───────────────────────────────────────────

/// Slide position of a multi-image card. Movement wraps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    position: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Carousel { position: 0, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next_index(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.position + 1) % self.len
        }
    }

    pub fn prev_index(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.position + self.len - 1) % self.len
        }
    }

    pub fn next(&mut self) -> usize {
        self.position = self.next_index();
        self.position
    }

    #[cfg(test)]
    pub fn prev(&mut self) -> usize {
        self.position = self.prev_index();
        self.position
    }

    #[cfg(test)]
    pub fn go(&mut self, index: usize) -> usize {
        if self.len > 0 {
            self.position = index % self.len;
        }
        self.position
    }
}

// ── Transitions ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Shown,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    InsertIntoLayout,
    FadeIn,
    FadeOut,
    RemoveFromLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub at: Duration,
    pub action: StepAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionTimings {
    pub show_delay: Duration,
    pub hide_delay: Duration,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        TransitionTimings {
            show_delay: Duration::from_millis(10),
            hide_delay: Duration::from_millis(300),
        }
    }
}

/// A card moving to `to`. Hiding fades first and leaves the layout only once
/// the fade window has elapsed; showing enters the layout before fading in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub card: String,
    pub to: Visibility,
    pub steps: Vec<Step>,
}

impl Transition {
    pub fn new(card: &str, to: Visibility, timings: TransitionTimings) -> Self {
        let steps = match to {
            Visibility::Shown => vec![
                Step { at: Duration::ZERO, action: StepAction::InsertIntoLayout },
                Step { at: timings.show_delay, action: StepAction::FadeIn },
            ],
            Visibility::Hidden => vec![
                Step { at: Duration::ZERO, action: StepAction::FadeOut },
                Step { at: timings.hide_delay, action: StepAction::RemoveFromLayout },
            ],
        };
        Transition {
            card: card.to_string(),
            to,
            steps,
        }
    }

    /// Time until the card reaches its final state.
    pub fn duration(&self) -> Duration {
        self.steps.iter().map(|s| s.at).max().unwrap_or_default()
    }
}

// ── Category filter ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Theme(String),
}

impl Filter {
    /// `None`, empty, or `all` select everything.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_FILTER) => Filter::All,
            Some(id) => Filter::Theme(id.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Filter::All => ALL_FILTER,
            Filter::Theme(id) => id,
        }
    }

    pub fn matches(&self, theme_id: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Theme(id) => id == theme_id,
        }
    }
}

/// Exactly one filter is active at a time.
#[derive(Debug, Clone)]
pub struct FilterState {
    active: Filter,
    timings: TransitionTimings,
}

impl FilterState {
    pub fn new(timings: TransitionTimings) -> Self {
        FilterState {
            active: Filter::All,
            timings,
        }
    }

    pub fn active(&self) -> &Filter {
        &self.active
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.key() == key
    }

    /// Activate `filter` and return the transitions for every card whose
    /// visibility changes. `cards` is `(card id, theme id)`.
    pub fn select<'a>(
        &mut self,
        filter: Filter,
        cards: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<Transition> {
        let previous = std::mem::replace(&mut self.active, filter);
        cards
            .into_iter()
            .filter_map(|(card, theme)| {
                let was = previous.matches(theme);
                let now = self.active.matches(theme);
                match (was, now) {
                    (false, true) => Some(Transition::new(card, Visibility::Shown, self.timings)),
                    (true, false) => Some(Transition::new(card, Visibility::Hidden, self.timings)),
                    _ => None,
                }
            })
            .collect()
    }
}

// ── Search filter ──────────────────────────────────────

/// Case-insensitive substring match over a project's title, description,
/// and category, in the active language with English fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    /// `None` for a missing or blank term.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let term = raw?.trim();
        if term.is_empty() {
            return None;
        }
        Some(SearchFilter {
            needle: term.to_lowercase(),
        })
    }

    pub fn term(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, theme: &Theme, project: &Project, lang: Lang) -> bool {
        let haystacks = [
            project.title.get(lang),
            project.description.get(lang),
            theme.title.get(lang),
            theme.id.as_str(),
        ];
        haystacks
            .iter()
            .any(|h| h.to_lowercase().contains(&self.needle))
    }
}

// ── Grid ───────────────────────────────────────────────

/// Visibility of one card in the full grid.
#[derive(Debug, Clone, Serialize)]
pub struct CardState<'a> {
    pub card: &'a str,
    pub theme: &'a str,
    #[serde(skip)]
    pub project: &'a Project,
    /// False when the search term excludes the card. Such a card stays
    /// hidden whichever category filter is active.
    pub search_match: bool,
    pub visibility: Visibility,
}

/// The full grid: category filter AND search filter.
pub struct GridView<'a> {
    catalog: &'a Catalog,
    lang: Lang,
    filter: FilterState,
    search: Option<SearchFilter>,
}

impl<'a> GridView<'a> {
    pub fn new(catalog: &'a Catalog, lang: Lang, timings: TransitionTimings) -> Self {
        GridView {
            catalog,
            lang,
            filter: FilterState::new(timings),
            search: None,
        }
    }

    pub fn with_search(mut self, search: Option<SearchFilter>) -> Self {
        self.search = search;
        self
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn search(&self) -> Option<&SearchFilter> {
        self.search.as_ref()
    }

    /// Activate a filter; unknown theme ids fall back to `all`.
    pub fn select(&mut self, filter: Filter) -> Vec<Transition> {
        let filter = match filter {
            Filter::Theme(ref id) if self.catalog.theme(id).is_none() => Filter::All,
            f => f,
        };
        let searched: Vec<(&str, &str)> = self
            .catalog
            .flatten()
            .filter(|(t, p)| self.search_matches(t, p))
            .map(|(t, p)| (p.id.as_str(), t.id.as_str()))
            .collect();
        self.filter.select(filter, searched)
    }

    fn search_matches(&self, theme: &Theme, project: &Project) -> bool {
        self.search
            .as_ref()
            .map(|s| s.matches(theme, project, self.lang))
            .unwrap_or(true)
    }

    pub fn is_visible(&self, theme: &Theme, project: &Project) -> bool {
        self.filter.active().matches(&theme.id) && self.search_matches(theme, project)
    }

    pub fn cards(&self) -> Vec<CardState<'a>> {
        self.catalog
            .flatten()
            .map(|(t, p)| CardState {
                card: p.id.as_str(),
                theme: t.id.as_str(),
                project: p,
                search_match: self.search_matches(t, p),
                visibility: if self.is_visible(t, p) {
                    Visibility::Shown
                } else {
                    Visibility::Hidden
                },
            })
            .collect()
    }

    pub fn visible_ids(&self) -> Vec<&'a str> {
        self.cards()
            .into_iter()
            .filter(|c| c.visibility == Visibility::Shown)
            .map(|c| c.card)
            .collect()
    }
}

// ── Featured ───────────────────────────────────────────

/// `count` distinct projects drawn uniformly (Fisher-Yates) from the catalog.
pub fn select_featured<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    count: usize,
    rng: &mut R,
) -> Vec<(&'a Theme, &'a Project)> {
    let mut all: Vec<(&Theme, &Project)> = catalog.flatten().collect();
    all.shuffle(rng);
    all.truncate(count);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carousel_wraps_both_ways() {
        let mut c = Carousel::new(3);
        assert_eq!(c.prev(), 2);
        assert_eq!(c.next(), 0);
        assert_eq!(c.go(2), 2);
        assert_eq!(c.next(), 0);
        assert_eq!(c.go(7), 1);
    }

    #[test]
    fn empty_carousel_stays_at_zero() {
        let mut c = Carousel::new(0);
        assert_eq!(c.next(), 0);
        assert_eq!(c.prev(), 0);
        assert_eq!(c.go(4), 0);
    }

    #[test]
    fn hide_fades_before_leaving_layout() {
        let t = Transition::new("a", Visibility::Hidden, TransitionTimings::default());
        assert_eq!(t.steps[0].action, StepAction::FadeOut);
        assert_eq!(t.steps[1].action, StepAction::RemoveFromLayout);
        assert!(t.steps[0].at < t.steps[1].at);
        assert_eq!(t.duration(), Duration::from_millis(300));
    }

    #[test]
    fn show_enters_layout_before_fading_in() {
        let t = Transition::new("a", Visibility::Shown, TransitionTimings::default());
        assert_eq!(t.steps[0].action, StepAction::InsertIntoLayout);
        assert_eq!(t.steps[1].action, StepAction::FadeIn);
        assert_eq!(t.duration(), Duration::from_millis(10));
    }

    #[test]
    fn filter_select_only_reports_changes() {
        let cards = [("a1", "a"), ("a2", "a"), ("b1", "b")];
        let mut state = FilterState::new(TransitionTimings::default());

        let to_b = state.select(Filter::parse(Some("b")), cards);
        assert!(state.is_active("b"));
        let hidden: Vec<&str> = to_b.iter().map(|t| t.card.as_str()).collect();
        assert_eq!(hidden, ["a1", "a2"]);
        assert!(to_b.iter().all(|t| t.to == Visibility::Hidden));

        let to_all = state.select(Filter::All, cards);
        assert!(state.is_active(ALL_FILTER));
        assert_eq!(to_all.len(), 2);
        assert!(to_all.iter().all(|t| t.to == Visibility::Shown));

        assert!(state.select(Filter::All, cards).is_empty());
    }

    #[test]
    fn blank_inputs_parse_to_defaults() {
        assert_eq!(Filter::parse(None), Filter::All);
        assert_eq!(Filter::parse(Some("  ")), Filter::All);
        assert_eq!(Filter::parse(Some("all")), Filter::All);
        assert!(SearchFilter::parse(Some("   ")).is_none());
        assert_eq!(SearchFilter::parse(Some(" MaP ")).unwrap().term(), "map");
    }
}
