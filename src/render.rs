use crate::i18n::Table;
use crate::models::catalog::Theme;
use crate::models::project::{Project, ProjectKind};
use crate::portfolio::{
    Carousel, Filter, GridView, Transition, TransitionTimings, Visibility, ALL_FILTER,
};
use crate::prefs::Lang;

/// Render one project card. Depends only on its arguments.
pub fn render_card(project: &Project, theme_id: &str, lang: Lang, table: &Table) -> String {
    let title = project.title.get(lang);
    let description = project.description.get(lang);

    let link = match (&project.kind, project.link.as_deref().and_then(live_link)) {
        (ProjectKind::Web | ProjectKind::ImageGallery, Some(url)) => format!(
            r#"<a href="{}" class="btn btn-live" target="_blank" rel="noopener">{}</a>"#,
            html_escape(url),
            html_escape(&table.t("portfolio.viewLive", "View Live"))
        ),
        _ => String::new(),
    };

    format!(
        r#"<article class="project-card" id="card-{id}" data-card="{id}" data-category="{theme}" data-type="{kind}">
    <div class="project-media">{media}</div>
    <div class="project-info">
        <h3 class="project-title">{title}</h3>
        <p class="project-description">{description}</p>
        {link}
    </div>
</article>"#,
        id = html_escape(&project.id),
        theme = html_escape(theme_id),
        kind = kind_name(project.kind),
        media = render_media(project, title, table),
        title = html_escape(title),
        description = html_escape(description),
        link = link,
    )
}

/// Links leaving the card must be http(s) or site-relative. Anything else
/// (`javascript:`, `data:`) is dropped.
fn live_link(link: &str) -> Option<&str> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    match url::Url::parse(link) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Some(link),
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => Some(link),
        Err(_) => None,
    }
}

fn kind_name(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::Web => "web",
        ProjectKind::ImageGallery => "image-gallery",
        ProjectKind::Video => "video",
        ProjectKind::Pdf => "pdf",
    }
}

fn render_media(project: &Project, title: &str, table: &Table) -> String {
    match project.kind {
        ProjectKind::Web | ProjectKind::ImageGallery => match project.images.as_slice() {
            [] => render_placeholder(table),
            [single] => format!(
                r#"<img src="{}" alt="{}" loading="lazy">"#,
                html_escape(&asset_url(single)),
                html_escape(title)
            ),
            many => render_carousel(many, title),
        },
        ProjectKind::Video => match project.src.as_deref().filter(|s| !s.is_empty()) {
            Some(src) => format!(
                r#"<video class="project-video" controls preload="metadata"><source src="{}" type="{}"></video>"#,
                html_escape(&asset_url(src)),
                video_mime(src)
            ),
            None => render_placeholder(table),
        },
        ProjectKind::Pdf => {
            let preview = project
                .image
                .as_deref()
                .or_else(|| project.images.first().map(String::as_str))
                .filter(|s| !s.is_empty());
            let preview_html = match preview {
                Some(img) => format!(
                    r#"<img src="{}" alt="{}" loading="lazy">"#,
                    html_escape(&asset_url(img)),
                    html_escape(title)
                ),
                None => render_placeholder(table),
            };
            match project.src.as_deref().filter(|s| !s.is_empty()) {
                Some(src) => format!(
                    r#"<div class="pdf-preview">{}<div class="pdf-overlay"><a href="{}" class="btn btn-download" download>{}</a></div></div>"#,
                    preview_html,
                    html_escape(&asset_url(src)),
                    html_escape(&table.t("portfolio.clickToDownload", "Click to download"))
                ),
                None => preview_html,
            }
        }
    }
}

fn render_placeholder(table: &Table) -> String {
    format!(
        r#"<div class="project-placeholder">{}</div>"#,
        html_escape(&table.t("portfolio.noImage", "No Image"))
    )
}

/// Slides plus prev/next controls. The track carries the current position;
/// each slide carries its neighbours and each control the index it moves to.
fn render_carousel(images: &[String], title: &str) -> String {
    let mut carousel = Carousel::new(images.len());
    if carousel.is_empty() {
        return String::new();
    }
    let mut html = format!(
        r#"<div class="carousel" data-carousel><div class="carousel-track" data-index="{}" data-count="{}">"#,
        carousel.position(),
        carousel.len()
    );
    // One full lap: every slide once, ending back on the first.
    for img in images {
        let i = carousel.position();
        html.push_str(&format!(
            r#"<img class="carousel-slide{}" data-slide="{}" data-prev="{}" data-next="{}" src="{}" alt="{} ({}/{})" loading="lazy">"#,
            if i == 0 { " active" } else { "" },
            i,
            carousel.prev_index(),
            carousel.next_index(),
            html_escape(&asset_url(img)),
            html_escape(title),
            i + 1,
            images.len()
        ));
        carousel.next();
    }
    html.push_str(&format!(
        r#"</div><button class="carousel-btn prev" type="button" data-goto="{}" aria-label="Previous">&#10094;</button><button class="carousel-btn next" type="button" data-goto="{}" aria-label="Next">&#10095;</button></div>"#,
        carousel.prev_index(),
        carousel.next_index()
    ));
    html
}

fn video_mime(src: &str) -> &'static str {
    let ext = src.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        _ => "video/mp4",
    }
}

/// Site-relative asset paths live under `/static`.
pub fn asset_url(path: &str) -> String {
    if path.starts_with('/') || path.contains("://") {
        path.to_string()
    } else {
        format!("/static/{}", path.trim_start_matches("./"))
    }
}

/// `/portfolio` with the given filter and search term as query parameters.
pub fn portfolio_url(filter: &str, search: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if filter != ALL_FILTER {
        query.append_pair("filter", filter);
    }
    if let Some(term) = search {
        query.append_pair("search", term);
    }
    let query = query.finish();
    if query.is_empty() {
        "/portfolio".to_string()
    } else {
        format!("/portfolio?{}", query)
    }
}

/// One button per theme plus the leading "all" button.
pub fn render_filter_bar(view: &GridView<'_>, table: &Table) -> String {
    let search = view.search().map(|s| s.term());
    let lang = view.lang();
    let state = view.filter();

    let mut html = String::from(r#"<div class="filter-bar" role="toolbar">"#);
    html.push_str(&format!(
        r#"<a href="{}" class="filter-btn{}" data-filter="{}" data-i18n="portfolio.filterAll">{}</a>"#,
        html_escape(&portfolio_url(ALL_FILTER, search)),
        if state.is_active(ALL_FILTER) { " active" } else { "" },
        ALL_FILTER,
        html_escape(&table.t("portfolio.filterAll", "All"))
    ));
    for theme in &view.catalog().themes {
        html.push_str(&render_filter_button(theme, state.is_active(&theme.id), lang, search));
    }
    html.push_str("</div>");
    html
}

fn render_filter_button(theme: &Theme, active: bool, lang: Lang, search: Option<&str>) -> String {
    format!(
        r#"<a href="{}" class="filter-btn{}" data-filter="{}">{}</a>"#,
        html_escape(&portfolio_url(&theme.id, search)),
        if active { " active" } else { "" },
        html_escape(&theme.id),
        html_escape(theme.title.get(lang))
    )
}

/// Every card of the catalog, hidden ones kept in the markup so the browser
/// can switch filters without a reload.
pub fn render_grid(view: &GridView<'_>, table: &Table, timings: TransitionTimings) -> String {
    if view.catalog().is_empty() {
        return r#"<p class="portfolio-empty" data-i18n="portfolio.empty">No projects yet.</p>"#
            .to_string();
    }

    let mut html = String::new();
    if let Some(search) = view.search() {
        html.push_str(&format!(
            r#"<p class="search-summary"><span data-i18n="portfolio.searchResults">Results for</span> &ldquo;{}&rdquo; <a href="{}" data-i18n="portfolio.clearSearch">Clear</a></p>"#,
            html_escape(search.term()),
            html_escape(&portfolio_url(view.filter().active().key(), None))
        ));
    }

    // The script replays these: a card leaves the layout once its fade-out
    // has finished and fades in right after re-entering it.
    let show = Transition::new("", Visibility::Shown, timings);
    let hide = Transition::new("", Visibility::Hidden, timings);
    html.push_str(&format!(
        r#"<div class="portfolio-grid" data-active-filter="{}" data-show-delay="{}" data-hide-delay="{}">"#,
        html_escape(view.filter().active().key()),
        show.duration().as_millis(),
        hide.duration().as_millis()
    ));

    for card in view.cards() {
        let hidden = card.visibility == Visibility::Hidden;
        html.push_str(&format!(
            r#"<div class="project-slot{}" data-category="{}" data-card="{}" data-search-match="{}"{}>{}</div>"#,
            if hidden { " is-hidden" } else { "" },
            html_escape(card.theme),
            html_escape(card.card),
            card.search_match,
            if hidden { " hidden" } else { "" },
            render_card(card.project, card.theme, view.lang(), table)
        ));
    }
    html.push_str("</div>");

    if view.visible_ids().is_empty() {
        html.push_str(
            r#"<p class="portfolio-empty" data-i18n="portfolio.noResults">No projects match.</p>"#,
        );
    }
    html
}

/// The home page strip.
pub fn render_featured(items: &[(&Theme, &Project)], lang: Lang, table: &Table) -> String {
    if items.is_empty() {
        return r#"<p class="portfolio-empty" data-i18n="portfolio.empty">No projects yet.</p>"#
            .to_string();
    }
    let mut html = String::from(r#"<div class="featured-grid">"#);
    for (theme, project) in items {
        html.push_str(&render_card(project, &theme.id, lang, table));
    }
    html.push_str("</div>");
    html
}

/// The filter a request asked for, kept as typed for display.
pub fn filter_label(filter: &Filter, view: &GridView<'_>) -> String {
    match filter {
        Filter::All => ALL_FILTER.to_string(),
        Filter::Theme(id) => view
            .catalog()
            .theme(id)
            .map(|t| t.title.get(view.lang()).to_string())
            .unwrap_or_else(|| id.clone()),
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
