//! SQLite-backed movie catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use tracing::{debug, info, warn};

use super::{
    CatalogError, CatalogStats, HomePageSets, Movie, MovieCatalog, MovieSuggestion, SearchPage,
    ACTION_GENRE, COMEDY_GENRE,
};
use crate::query::pagination::{offset, paginate};
use crate::query::{CatalogQuery, MovieFilters, OrderBy};

const MOVIE_COLUMNS: &str = "m.id, m.url, m.title, m.subtitle, m.year, m.rating, m.language,
     m.country, m.director, m.poster, m.background, m.trailer_embed,
     m.cast_json, m.related_json, m.screenshots_json, m.tags_json, m.added_at";

/// SQLite-backed movie catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

/// WHERE clause plus its positional arguments.
struct Conditions {
    clauses: Vec<&'static str>,
    args: Vec<Value>,
}

impl Conditions {
    fn new() -> Self {
        Self {
            clauses: Vec::new(),
            args: Vec::new(),
        }
    }

    fn from_query(text: Option<&str>, filters: &MovieFilters) -> Self {
        let mut cond = Self::new();
        if let Some(text) = text {
            cond.push("instr(m.title_search, ?) > 0", Value::Text(text.to_lowercase()));
        }
        if let Some(quality) = &filters.quality {
            cond.push(
                "EXISTS (SELECT 1 FROM movie_qualities q WHERE q.movie_id = m.id AND q.quality_key = ?)",
                Value::Text(quality.to_lowercase()),
            );
        }
        if let Some(genre) = &filters.genre {
            cond.push(
                "EXISTS (SELECT 1 FROM movie_genres g WHERE g.movie_id = m.id AND g.genre_key = ?)",
                Value::Text(genre.to_lowercase()),
            );
        }
        if let Some(language) = &filters.language {
            cond.push("m.language_key = ?", Value::Text(language.to_lowercase()));
        }
        if let Some(rating) = filters.rating {
            cond.push("m.rating >= ?", Value::Real(f64::from(rating.min())));
        }
        if let Some(year) = filters.year {
            let (from, to) = year.bounds();
            cond.clauses.push("m.year BETWEEN ? AND ?");
            cond.args.push(Value::Integer(i64::from(from)));
            cond.args.push(Value::Integer(i64::from(to)));
        }
        cond
    }

    fn push(&mut self, clause: &'static str, arg: Value) {
        self.clauses.push(clause);
        self.args.push(arg);
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn order_sql(order: OrderBy) -> &'static str {
    match order {
        OrderBy::Latest => "m.added_at DESC, m.id DESC",
        OrderBy::Oldest => "m.added_at ASC, m.id ASC",
        OrderBy::Year => "m.year DESC, m.added_at DESC, m.id DESC",
        OrderBy::Rating => "m.rating DESC, m.added_at DESC, m.id DESC",
        OrderBy::Alphabetical => "m.title_search ASC, m.added_at DESC, m.id DESC",
    }
}

fn db_err(e: rusqlite::Error) -> CatalogError {
    CatalogError::Database(e.to_string())
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    // Fixed-width UTC so text ordering matches time ordering.
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a JSON list column; a corrupt value reads as empty.
fn parse_json_list<T: serde::de::DeserializeOwned>(raw: &str, column: &str, url: &str) -> Vec<T> {
    match serde_json::from_str(raw) {
        Ok(list) => list,
        Err(e) => {
            warn!(column, url, error = %e, "Corrupt JSON list column, reading as empty");
            Vec::new()
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CatalogError> {
    serde_json::to_string(value).map_err(|e| CatalogError::Internal(e.to_string()))
}

impl SqliteCatalog {
    /// Open a SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            -- One row per movie; list-valued fields that are never filtered on
            -- are stored as JSON arrays.
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                title_search TEXT NOT NULL,
                subtitle TEXT,
                year INTEGER NOT NULL,
                rating REAL NOT NULL DEFAULT 0,
                language TEXT,
                language_key TEXT,
                country TEXT,
                director TEXT,
                poster TEXT,
                background TEXT,
                trailer_embed TEXT,
                cast_json TEXT NOT NULL DEFAULT '[]',
                related_json TEXT NOT NULL DEFAULT '[]',
                screenshots_json TEXT NOT NULL DEFAULT '[]',
                tags_json TEXT NOT NULL DEFAULT '[]',
                added_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_movies_added_at ON movies(added_at);
            CREATE INDEX IF NOT EXISTS idx_movies_year ON movies(year);
            CREATE INDEX IF NOT EXISTS idx_movies_rating ON movies(rating);
            CREATE INDEX IF NOT EXISTS idx_movies_language ON movies(language_key);

            -- Genres in display order
            CREATE TABLE IF NOT EXISTS movie_genres (
                movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                genre TEXT NOT NULL,
                genre_key TEXT NOT NULL,
                PRIMARY KEY(movie_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_movie_genres_key ON movie_genres(genre_key);

            -- Available qualities
            CREATE TABLE IF NOT EXISTS movie_qualities (
                movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                quality TEXT NOT NULL,
                quality_key TEXT NOT NULL,
                PRIMARY KEY(movie_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_movie_qualities_key ON movie_qualities(quality_key);
            "#,
        )
        .map_err(db_err)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    /// Load movies into the catalog, skipping urls already present.
    ///
    /// Returns the number of movies added. Used for seeding; the site itself
    /// never writes to the catalog.
    pub fn insert_movies(&self, movies: &[Movie]) -> Result<u32, CatalogError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(db_err)?;
        let mut added = 0;

        for movie in movies {
            let inserted = tx
                .execute(
                    "INSERT INTO movies (url, title, title_search, subtitle, year, rating,
                        language, language_key, country, director, poster, background,
                        trailer_embed, cast_json, related_json, screenshots_json, tags_json, added_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                     ON CONFLICT(url) DO NOTHING",
                    params![
                        &movie.url,
                        &movie.title,
                        movie.title.to_lowercase(),
                        &movie.subtitle,
                        movie.year,
                        f64::from(movie.rating),
                        &movie.language,
                        movie.language.as_ref().map(|l| l.to_lowercase()),
                        &movie.country,
                        &movie.director,
                        &movie.poster,
                        &movie.background,
                        &movie.trailer_embed,
                        to_json(&movie.cast)?,
                        to_json(&movie.related)?,
                        to_json(&movie.screenshots)?,
                        to_json(&movie.tags)?,
                        format_timestamp(&movie.added_at),
                    ],
                )
                .map_err(db_err)?;

            if inserted == 0 {
                debug!(url = %movie.url, "Movie already in catalog, skipping");
                continue;
            }

            let movie_id = tx.last_insert_rowid();
            for (position, genre) in movie.genres.iter().enumerate() {
                tx.execute(
                    "INSERT INTO movie_genres (movie_id, position, genre, genre_key) VALUES (?, ?, ?, ?)",
                    params![movie_id, position as i64, genre, genre.to_lowercase()],
                )
                .map_err(db_err)?;
            }
            for (position, quality) in movie.qualities.iter().enumerate() {
                tx.execute(
                    "INSERT INTO movie_qualities (movie_id, position, quality, quality_key) VALUES (?, ?, ?, ?)",
                    params![movie_id, position as i64, quality, quality.to_lowercase()],
                )
                .map_err(db_err)?;
            }
            added += 1;
        }

        tx.commit().map_err(db_err)?;
        Ok(added)
    }

    /// Seed the catalog from a JSON file holding an array of movies.
    pub fn import_json(&self, path: &Path) -> Result<u32, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Internal(format!("reading {}: {}", path.display(), e)))?;
        let movies: Vec<Movie> = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::Internal(format!("parsing {}: {}", path.display(), e)))?;
        let added = self.insert_movies(&movies)?;
        info!(path = %path.display(), added, total = movies.len(), "Imported movies into catalog");
        Ok(added)
    }

    /// True when the catalog holds no movies.
    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count == 0)
    }

    /// Load the ordered values of a list table (`movie_genres` or `movie_qualities`).
    fn load_list(
        conn: &Connection,
        sql: &str,
        movie_id: i64,
    ) -> Result<Vec<String>, CatalogError> {
        let mut stmt = conn.prepare_cached(sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params![movie_id], |row| row.get(0))
            .map_err(db_err)?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row.map_err(db_err)?);
        }
        Ok(values)
    }

    /// Fill in genres and qualities for a movie row.
    fn load_lists(conn: &Connection, movie_id: i64, movie: &mut Movie) -> Result<(), CatalogError> {
        movie.genres = Self::load_list(
            conn,
            "SELECT genre FROM movie_genres WHERE movie_id = ? ORDER BY position",
            movie_id,
        )?;
        movie.qualities = Self::load_list(
            conn,
            "SELECT quality FROM movie_qualities WHERE movie_id = ? ORDER BY position",
            movie_id,
        )?;
        Ok(())
    }

    /// Convert a row to a Movie (without genres/qualities) plus its row id.
    fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<(i64, Movie)> {
        let rating: f64 = row.get(5)?;
        let cast_json: String = row.get(12)?;
        let related_json: String = row.get(13)?;
        let screenshots_json: String = row.get(14)?;
        let tags_json: String = row.get(15)?;
        let added_at_str: String = row.get(16)?;
        let url: String = row.get(1)?;

        let added_at = DateTime::parse_from_rfc3339(&added_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let movie = Movie {
            title: row.get(2)?,
            subtitle: row.get(3)?,
            year: row.get(4)?,
            genres: Vec::new(), // Loaded separately
            rating: rating as f32,
            qualities: Vec::new(), // Loaded separately
            language: row.get(6)?,
            country: row.get(7)?,
            director: row.get(8)?,
            cast: parse_json_list(&cast_json, "cast_json", &url),
            related: parse_json_list(&related_json, "related_json", &url),
            poster: row.get(9)?,
            background: row.get(10)?,
            screenshots: parse_json_list(&screenshots_json, "screenshots_json", &url),
            trailer_embed: row.get(11)?,
            tags: parse_json_list(&tags_json, "tags_json", &url),
            added_at,
            url,
        };
        Ok((row.get(0)?, movie))
    }

    /// Run a movie SELECT with the given conditions, order and window.
    fn query_movies(
        conn: &Connection,
        cond: &Conditions,
        order: &str,
        limit: u32,
        skip: u64,
    ) -> Result<Vec<Movie>, CatalogError> {
        let sql = format!(
            "SELECT {} FROM movies m {} ORDER BY {} LIMIT ? OFFSET ?",
            MOVIE_COLUMNS,
            cond.where_sql(),
            order
        );
        let mut args = cond.args.clone();
        args.push(Value::Integer(i64::from(limit)));
        args.push(Value::Integer(i64::try_from(skip).unwrap_or(i64::MAX)));

        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), Self::row_to_movie)
            .map_err(db_err)?;

        let mut movies = Vec::new();
        for row in rows {
            let (movie_id, mut movie) = row.map_err(db_err)?;
            Self::load_lists(conn, movie_id, &mut movie)?;
            movies.push(movie);
        }
        Ok(movies)
    }

    fn count_movies(conn: &Connection, cond: &Conditions) -> Result<u64, CatalogError> {
        let sql = format!("SELECT COUNT(*) FROM movies m {}", cond.where_sql());
        let count: i64 = conn
            .query_row(&sql, params_from_iter(cond.args.iter()), |row| row.get(0))
            .map_err(db_err)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn movies_in_genre(
        conn: &Connection,
        genre: &str,
        limit: u32,
    ) -> Result<Vec<Movie>, CatalogError> {
        let filters = MovieFilters {
            genre: Some(genre.to_string()),
            ..Default::default()
        };
        let cond = Conditions::from_query(None, &filters);
        Self::query_movies(conn, &cond, order_sql(OrderBy::Latest), limit, 0)
    }
}

impl MovieCatalog for SqliteCatalog {
    fn home_page_sets(&self, per_category_limit: u32) -> Result<HomePageSets, CatalogError> {
        let conn = self.conn()?;

        Ok(HomePageSets {
            recent: Self::query_movies(
                &conn,
                &Conditions::new(),
                order_sql(OrderBy::Latest),
                per_category_limit,
                0,
            )?,
            action: Self::movies_in_genre(&conn, ACTION_GENRE, per_category_limit)?,
            comedy: Self::movies_in_genre(&conn, COMEDY_GENRE, per_category_limit)?,
        })
    }

    fn find_by_url(&self, url: &str) -> Result<Movie, CatalogError> {
        let conn = self.conn()?;

        let sql = format!("SELECT {} FROM movies m WHERE m.url = ?", MOVIE_COLUMNS);
        let (movie_id, mut movie) = conn
            .query_row(&sql, params![url], Self::row_to_movie)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(url.to_string()),
                _ => db_err(e),
            })?;

        Self::load_lists(&conn, movie_id, &mut movie)?;
        Ok(movie)
    }

    fn search(&self, query: &CatalogQuery) -> Result<SearchPage, CatalogError> {
        let conn = self.conn()?;
        let cond = Conditions::from_query(query.text.as_deref(), &query.filters);

        let total_matches = Self::count_movies(&conn, &cond)?;
        let window = paginate(total_matches, query.page_size, i64::from(query.page));

        let results = if offset(window.page, query.page_size) >= total_matches {
            Vec::new()
        } else {
            Self::query_movies(
                &conn,
                &cond,
                order_sql(query.effective_order()),
                query.page_size.get(),
                offset(window.page, query.page_size),
            )?
        };

        Ok(SearchPage {
            results,
            total_matches,
            total_pages: window.total_pages,
            page: window.page,
        })
    }

    fn suggestions(&self, text: &str, limit: u32) -> Result<Vec<MovieSuggestion>, CatalogError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT url, poster, title, year FROM movies
                 WHERE instr(title_search, ?1) > 0
                 ORDER BY added_at DESC, id DESC
                 LIMIT ?2",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![text.trim().to_lowercase(), limit], |row| {
                Ok(MovieSuggestion {
                    url: row.get(0)?,
                    img: row.get(1)?,
                    title: row.get(2)?,
                    year: row.get(3)?,
                })
            })
            .map_err(db_err)?;

        let mut suggestions = Vec::new();
        for row in rows {
            suggestions.push(row.map_err(db_err)?);
        }
        Ok(suggestions)
    }

    fn sample_random(&self, count: u32) -> Result<Vec<Movie>, CatalogError> {
        let conn = self.conn()?;
        Self::query_movies(&conn, &Conditions::new(), "RANDOM()", count, 0)
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let conn = self.conn()?;

        let total_movies: i64 = conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(db_err)?;

        let unique_genres: u32 = conn
            .query_row(
                "SELECT COUNT(DISTINCT genre_key) FROM movie_genres",
                [],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        let (oldest_year, newest_year): (Option<u16>, Option<u16>) = conn
            .query_row("SELECT MIN(year), MAX(year) FROM movies", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(db_err)?;

        Ok(CatalogStats {
            total_movies: u64::try_from(total_movies).unwrap_or(0),
            unique_genres,
            oldest_year,
            newest_year,
        })
    }
}
