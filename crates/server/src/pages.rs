//! Full HTML documents around the site's view models.

use std::fmt::Write;

use cartelera_core::site::{BrowseView, HomeView, MovieView, TrendingView};
use cartelera_core::view::escape_html;

/// Message shown when a movie does not exist.
pub const NOT_FOUND_MESSAGE: &str = "No se encontró la película.";

/// Message shown for any server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "Error en el servidor.";

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
<header class="main-header">
<a href="/" class="logo">Cartelera</a>
<nav>
<a href="/">Inicio</a>
<a href="/trending-movies">Tendencias</a>
<a href="/browse-movies">Explorar</a>
</nav>
<form id="quick-search" action="/browse-movies" autocomplete="off">
<input type="search" id="quick-search-input" name="title" placeholder="Buscar películas">
<div id="quick-search-results"></div>
</form>
</header>
<main>
{body}
</main>
<script src="/js/search.js"></script>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn section(out: &mut String, heading: &str, more_href: &str, grid_html: &str) {
    let _ = write!(
        out,
        r#"<section class="home-movies"><h2>{heading}</h2><a class="see-more" href="{more_href}">Ver todo</a><div class="movie-grid">{grid_html}</div></section>"#
    );
}

pub fn home_page(view: &HomeView) -> String {
    let mut body = String::new();
    section(&mut body, "Agregadas recientemente", "/browse-movies", &view.recent_html);
    section(
        &mut body,
        "Acción",
        "/browse-movies/0/all/Action/all/latest/all/all",
        &view.action_html,
    );
    section(
        &mut body,
        "Comedia",
        "/browse-movies/0/all/Comedy/all/latest/all/all",
        &view.comedy_html,
    );
    layout("Cartelera", &body)
}

pub fn trending_page(view: &TrendingView) -> String {
    let body = format!(
        r#"<section class="trending"><h1>Películas en tendencia</h1><div class="movie-grid">{}</div></section>"#,
        view.movies_html
    );
    layout("Tendencias - Cartelera", &body)
}

pub fn browse_page(view: &BrowseView) -> String {
    let mut body = format!(
        r#"<section class="browse"><form class="browse-search" action="/browse-movies"><input type="text" name="title" value="{}" placeholder="Título"></form>"#,
        escape_html(&view.title_search)
    );
    let _ = write!(
        body,
        r#"<h2 class="browse-count">{} películas encontradas</h2><div class="movie-grid">{}</div><nav class="pagination">{}</nav></section>"#,
        view.total_matches, view.results_html, view.pagination_html
    );
    layout("Explorar - Cartelera", &body)
}

fn list_items(out: &mut String, class: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, r#"<ul class="{class}">"#);
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape_html(item));
    }
    out.push_str("</ul>");
}

pub fn movie_page(view: &MovieView) -> String {
    let mut body = String::new();

    if let Some(background) = &view.background {
        let _ = write!(
            body,
            r#"<div class="movie-background" style="background-image: url('{}')"></div>"#,
            escape_html(background)
        );
    }

    body.push_str(r#"<article class="movie-detail">"#);
    if let Some(poster) = &view.poster {
        let _ = write!(
            body,
            r#"<img class="movie-poster" src="{}" alt="{}">"#,
            escape_html(poster),
            escape_html(&view.title)
        );
    }
    let _ = write!(
        body,
        r#"<h1>{}</h1><h2 class="movie-year">{}</h2><h2 class="movie-categories">{}</h2>"#,
        escape_html(&view.title),
        view.year,
        escape_html(&view.categories)
    );
    if let Some(subtitle) = &view.subtitle {
        let _ = write!(body, r#"<p class="movie-subtitle">{}</p>"#, escape_html(subtitle));
    }
    let _ = write!(body, r#"<p class="movie-rating">{:.1} / 10</p>"#, view.rating);
    if let Some(director) = &view.director {
        let _ = write!(body, r#"<p class="movie-director">Director: {}</p>"#, escape_html(director));
    }
    if let Some(country) = &view.country {
        let _ = write!(body, r#"<p class="movie-country">{}</p>"#, escape_html(country));
    }
    list_items(&mut body, "movie-qualities", &view.qualities);
    list_items(&mut body, "movie-cast", &view.cast);
    list_items(&mut body, "movie-tags", &view.tags);

    if let Some(embed) = &view.trailer_embed {
        let _ = write!(
            body,
            r#"<div class="movie-trailer"><iframe src="{}" allowfullscreen></iframe></div>"#,
            escape_html(embed)
        );
    }

    if !view.screenshots.is_empty() {
        body.push_str(r#"<div class="movie-screenshots">"#);
        for shot in &view.screenshots {
            let _ = write!(body, r#"<img src="{}" alt="">"#, escape_html(shot));
        }
        body.push_str("</div>");
    }

    if !view.related.is_empty() {
        body.push_str(r#"<section class="related-movies"><h3>Películas similares</h3>"#);
        for related in &view.related {
            let _ = write!(
                body,
                r#"<a href="/movies/{}" title="{}">"#,
                escape_html(&related.url),
                escape_html(&related.title)
            );
            if let Some(poster) = &related.poster {
                let _ = write!(body, r#"<img src="{}" alt="{}">"#, escape_html(poster), escape_html(&related.title));
            }
            body.push_str("</a>");
        }
        body.push_str("</section>");
    }
    body.push_str("</article>");

    layout(&format!("{} ({}) - Cartelera", view.title, view.year), &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<section class="error"><h1>{}</h1><a href="/">Volver al inicio</a></section>"#,
        escape_html(message)
    );
    layout("Error - Cartelera", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartelera_core::testing::fixtures;

    #[test]
    fn test_movie_page_shows_detail_fields() {
        let html = movie_page(&MovieView::from(fixtures::detailed_movie()));

        assert!(html.contains("<h1>Dune: Part Two</h1>"));
        assert!(html.contains("Sci-Fi / Adventure"));
        assert!(html.contains("Denis Villeneuve"));
        assert!(html.contains("https://www.youtube.com/embed/Way9Dexny3w"));
        assert!(html.contains(r#"href="/movies/dune-2021""#));
        assert!(html.contains("<li>2160p</li>"));
    }

    #[test]
    fn test_movie_page_escapes_title() {
        let movie = fixtures::movie("<script>alert(1)</script>", 2000, &[]);
        let html = movie_page(&MovieView::from(movie));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_error_page_message() {
        let html = error_page(NOT_FOUND_MESSAGE);
        assert!(html.contains("No se encontró la película."));
    }

    #[test]
    fn test_browse_page_echoes_title_search() {
        let view = BrowseView {
            results_html: String::new(),
            pagination_html: String::new(),
            title_search: "matrix \"reloaded\"".to_string(),
            page: 1,
            total_pages: 1,
            total_matches: 0,
        };
        let html = browse_page(&view);
        assert!(html.contains(r#"value="matrix &quot;reloaded&quot;""#));
    }

    #[test]
    fn test_search_forms_submit_title_to_browse() {
        let html = error_page(SERVER_ERROR_MESSAGE);
        assert!(html.contains(r#"<form id="quick-search" action="/browse-movies""#));
        assert!(html.contains(r#"id="quick-search-input" name="title""#));

        let html = browse_page(&BrowseView {
            results_html: String::new(),
            pagination_html: String::new(),
            title_search: String::new(),
            page: 1,
            total_pages: 1,
            total_matches: 0,
        });
        assert!(html.contains(r#"<form class="browse-search" action="/browse-movies"><input type="text" name="title""#));
    }
}
