//! HTML fragments for movie grids and pagination bars.
//!
//! Page templates live in the server; this module only produces the
//! repeated fragments the site service caches alongside its views.

mod html;

pub use html::{escape_html, HtmlRenderer};

use crate::catalog::Movie;

/// Renders catalog data into markup fragments.
pub trait MovieRenderer: Send + Sync {
    /// A grid of movie cards, truncated to `limit` cards when given.
    fn movie_grid(&self, movies: &[Movie], limit: Option<usize>) -> String;

    /// A pagination bar linking to `{base_path}?page=N`.
    fn pagination(&self, base_path: &str, total_pages: u32, current_page: u32) -> String;
}
