//! Testing utilities: an in-memory catalog and movie fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartelera_core::testing::{MockCatalog, fixtures};
//!
//! let catalog = Arc::new(MockCatalog::with_movies(fixtures::sample_catalog()));
//! let engine = QueryEngine::new(catalog.clone(), Duration::from_secs(5));
//!
//! engine.search(CatalogQuery::new(page_size)).await?;
//! assert_eq!(catalog.call_count("search"), 1);
//! ```

mod mock_catalog;

pub use mock_catalog::MockCatalog;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::catalog::{Movie, RelatedMovie};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Turn a title into a url slug: `"The Matrix"` becomes `"the-matrix"`.
    pub fn slug(title: &str) -> String {
        let mut slug = String::new();
        for c in title.to_lowercase().chars() {
            if c.is_alphanumeric() {
                slug.push(c);
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }

    /// Create a test movie with reasonable defaults. The url is
    /// `{slug(title)}-{year}`.
    pub fn movie(title: &str, year: u16, genres: &[&str]) -> Movie {
        let slug = slug(title);
        Movie {
            url: format!("{}-{}", slug, year),
            title: title.to_string(),
            subtitle: None,
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            rating: 7.0,
            qualities: vec!["1080p".to_string()],
            language: Some("en".to_string()),
            country: None,
            director: None,
            cast: Vec::new(),
            related: Vec::new(),
            poster: Some(format!("/img/{}.jpg", slug)),
            background: None,
            screenshots: Vec::new(),
            trailer_embed: None,
            tags: Vec::new(),
            added_at: base_time(),
        }
    }

    /// Create `n` movies titled "Movie 00", "Movie 01", ... added one minute
    /// apart, so the last one is the most recent.
    pub fn numbered_movies(n: usize) -> Vec<Movie> {
        const GENRES: [&str; 3] = ["Action", "Comedy", "Drama"];

        (0..n)
            .map(|i| {
                let mut movie = movie(
                    &format!("Movie {:02}", i),
                    2000 + (i % 100) as u16,
                    &[GENRES[i % GENRES.len()]],
                );
                movie.rating = (i % 10) as f32;
                movie.added_at = base_time() + Duration::minutes(i as i64);
                movie
            })
            .collect()
    }

    /// A movie with every optional field populated.
    pub fn detailed_movie() -> Movie {
        let mut movie = movie("Dune: Part Two", 2024, &["Sci-Fi", "Adventure"]);
        movie.subtitle = Some("Long live the fighters".to_string());
        movie.rating = 8.6;
        movie.qualities = vec!["1080p".to_string(), "2160p".to_string()];
        movie.country = Some("United States".to_string());
        movie.director = Some("Denis Villeneuve".to_string());
        movie.cast = vec![
            "Timothée Chalamet".to_string(),
            "Zendaya".to_string(),
            "Rebecca Ferguson".to_string(),
        ];
        movie.related = vec![RelatedMovie {
            url: "dune-2021".to_string(),
            title: "Dune".to_string(),
            poster: Some("/img/dune.jpg".to_string()),
        }];
        movie.background = Some("/img/dune-part-two-bg.jpg".to_string());
        movie.screenshots = vec![
            "/img/dune-part-two-1.jpg".to_string(),
            "/img/dune-part-two-2.jpg".to_string(),
        ];
        movie.trailer_embed = Some("https://www.youtube.com/embed/Way9Dexny3w".to_string());
        movie.tags = vec!["desert".to_string(), "sequel".to_string()];
        movie
    }

    /// A small, varied catalog: several genres, qualities and languages,
    /// including action movies from 2020 and comedies.
    pub fn sample_catalog() -> Vec<Movie> {
        let entries: [(&str, u16, &[&str], f32, &[&str], &str); 12] = [
            ("The Matrix", 1999, &["Action", "Sci-Fi"], 8.7, &["720p", "1080p"], "en"),
            ("Gattaca", 1997, &["Drama", "Sci-Fi"], 7.8, &["720p"], "en"),
            ("La Haine", 1995, &["Crime", "Drama"], 8.1, &["1080p"], "fr"),
            ("Amélie", 2001, &["Comedy", "Romance"], 8.3, &["720p", "1080p"], "fr"),
            ("Superbad", 2007, &["Comedy"], 7.6, &["1080p"], "en"),
            ("Blade Runner 2049", 2017, &["Sci-Fi", "Drama"], 8.0, &["1080p", "2160p"], "en"),
            ("1917", 2019, &["Action", "War"], 8.2, &["1080p", "2160p"], "en"),
            ("Tenet", 2020, &["Action", "Sci-Fi"], 7.3, &["1080p", "2160p"], "en"),
            ("Extraction", 2020, &["Action", "Thriller"], 6.7, &["1080p"], "en"),
            ("Nomadland", 2020, &["Drama"], 7.3, &["1080p"], "en"),
            ("Palm Springs", 2020, &["Comedy", "Romance"], 7.4, &["720p", "1080p"], "en"),
            ("Dune", 2021, &["Sci-Fi", "Adventure"], 8.0, &["2160p"], "en"),
        ];

        entries
            .iter()
            .enumerate()
            .map(|(i, (title, year, genres, rating, qualities, language))| {
                let mut movie = movie(title, *year, genres);
                movie.rating = *rating;
                movie.qualities = qualities.iter().map(|q| q.to_string()).collect();
                movie.language = Some(language.to_string());
                movie.added_at = base_time() + Duration::minutes(i as i64);
                movie
            })
            .collect()
    }
}
