use std::fmt::Write;

use super::MovieRenderer;
use crate::catalog::Movie;
use crate::query::pagination::page_links;

/// Pages shown on each side of the current one.
const PAGE_RADIUS: u32 = 2;

const PLACEHOLDER_POSTER: &str = "/images/placeholder.jpg";

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Link to a movie's detail page.
pub(crate) fn movie_href(url: &str) -> String {
    format!("/movies/{}", urlencoding::encode(url))
}

/// Default renderer producing the site's card and pagination markup.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn movie_card(&self, out: &mut String, movie: &Movie) {
        let href = movie_href(&movie.url);
        let title = escape_html(&movie.title);
        let poster = escape_html(movie.poster.as_deref().unwrap_or(PLACEHOLDER_POSTER));

        let _ = write!(
            out,
            r#"<div class="browse-movie-wrap"><a href="{href}" class="browse-movie-link"><figure><img class="img-responsive" src="{poster}" alt="{title}" width="170" height="255"><figcaption><h4 class="rating">{rating:.1} / 10</h4>"#,
            rating = movie.rating,
        );
        for genre in movie.genres.iter().take(2) {
            let _ = write!(out, "<h4>{}</h4>", escape_html(genre));
        }
        let _ = write!(
            out,
            r#"</figcaption></figure></a><div class="browse-movie-bottom"><a href="{href}" class="browse-movie-title">{title}</a><div class="browse-movie-year">{year}</div></div></div>"#,
            year = movie.year,
        );
    }

    fn page_item(out: &mut String, base: &str, page: u32, label: &str, current: bool) {
        if current {
            let _ = write!(out, r#"<li><a class="current">{label}</a></li>"#);
        } else {
            let _ = write!(out, r#"<li><a href="{base}?page={page}">{label}</a></li>"#);
        }
    }
}

impl MovieRenderer for HtmlRenderer {
    fn movie_grid(&self, movies: &[Movie], limit: Option<usize>) -> String {
        let shown = limit.unwrap_or(movies.len()).min(movies.len());
        let mut out = String::new();
        for movie in &movies[..shown] {
            self.movie_card(&mut out, movie);
        }
        out
    }

    fn pagination(&self, base_path: &str, total_pages: u32, current_page: u32) -> String {
        let total = total_pages.max(1);
        if total == 1 && current_page <= 1 {
            return String::new();
        }

        let base = escape_html(base_path);
        let mut out = String::from(r#"<ul class="tsc_pagination">"#);

        if current_page > 1 {
            Self::page_item(&mut out, &base, 1, "&laquo; Primera", false);
            let previous = current_page.saturating_sub(1).min(total);
            Self::page_item(&mut out, &base, previous, "Anterior", false);
        }
        for page in page_links(total, current_page, PAGE_RADIUS) {
            Self::page_item(&mut out, &base, page, &page.to_string(), page == current_page);
        }
        if current_page < total {
            Self::page_item(&mut out, &base, current_page + 1, "Siguiente", false);
            Self::page_item(&mut out, &base, total, "Última &raquo;", false);
        }

        out.push_str("</ul>");
        out
    }
}
