//! Browse facets and the `"all"` sentinel.
//!
//! The public URL scheme spells "no filter" as `all` (and an absent title as
//! `0`). Those spellings stop here: everything past this module sees
//! `Option::None` instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Movie;

/// Sentinel meaning "do not filter on this facet".
pub const ALL: &str = "all";

/// Title segment meaning "no free-text search".
pub const NO_TITLE: &str = "0";

/// A facet value that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for {facet}: {value:?}")]
pub struct FacetError {
    pub facet: &'static str,
    pub value: String,
}

impl FacetError {
    fn new(facet: &'static str, value: &str) -> Self {
        Self {
            facet,
            value: value.to_string(),
        }
    }
}

/// Minimum rating filter (`rating >= min`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingFilter(pub u8);

impl RatingFilter {
    pub fn min(self) -> f32 {
        f32::from(self.0)
    }
}

/// Release year filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearFilter {
    Exact(u16),
    /// Inclusive range.
    Range(u16, u16),
}

impl YearFilter {
    pub fn bounds(self) -> (u16, u16) {
        match self {
            YearFilter::Exact(year) => (year, year),
            YearFilter::Range(from, to) => (from, to),
        }
    }

    pub fn contains(self, year: u16) -> bool {
        let (from, to) = self.bounds();
        (from..=to).contains(&year)
    }
}

impl FromStr for YearFilter {
    type Err = FacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || FacetError::new("year", s);
        match s.split_once('-') {
            Some((from, to)) => {
                let from: u16 = from.trim().parse().map_err(|_| err())?;
                let to: u16 = to.trim().parse().map_err(|_| err())?;
                if from > to {
                    return Err(err());
                }
                Ok(YearFilter::Range(from, to))
            }
            None => s.trim().parse().map(YearFilter::Exact).map_err(|_| err()),
        }
    }
}

/// Sort order for browse results. A single key; ties fall back to recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Most recently added first.
    #[default]
    Latest,
    /// Least recently added first.
    Oldest,
    /// Newest release year first.
    Year,
    /// Highest rating first.
    Rating,
    /// Title A to Z.
    Alphabetical,
}

impl OrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Latest => "latest",
            OrderBy::Oldest => "oldest",
            OrderBy::Year => "year",
            OrderBy::Rating => "rating",
            OrderBy::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = FacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Ok(OrderBy::Latest),
            "oldest" => Ok(OrderBy::Oldest),
            "year" => Ok(OrderBy::Year),
            "rating" => Ok(OrderBy::Rating),
            "alphabetical" | "title" => Ok(OrderBy::Alphabetical),
            _ => Err(FacetError::new("order_by", s)),
        }
    }
}

/// Conjunctive facet filters. `None` means the facet is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFilters {
    pub quality: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub rating: Option<RatingFilter>,
    pub year: Option<YearFilter>,
}

impl MovieFilters {
    /// True when no facet is constrained.
    pub fn is_empty(&self) -> bool {
        self.quality.is_none()
            && self.genre.is_none()
            && self.language.is_none()
            && self.rating.is_none()
            && self.year.is_none()
    }

    /// Whether a movie satisfies every constrained facet.
    pub fn matches(&self, movie: &Movie) -> bool {
        self.quality
            .as_deref()
            .is_none_or(|q| movie.qualities.iter().any(|m| same_text(m, q)))
            && self
                .genre
                .as_deref()
                .is_none_or(|g| movie.genres.iter().any(|m| same_text(m, g)))
            && self
                .language
                .as_deref()
                .is_none_or(|l| movie.language.as_deref().is_some_and(|m| same_text(m, l)))
            && self.rating.is_none_or(|r| movie.rating >= r.min())
            && self.year.is_none_or(|y| y.contains(movie.year))
    }
}

/// Case-insensitive substring match of a search term against a title.
pub fn title_matches(title: &str, text: &str) -> bool {
    title.to_lowercase().contains(&text.to_lowercase())
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Translate a raw facet segment: the sentinel and blanks become `None`.
pub fn facet(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalize free-text input: blank text means no text search.
pub fn search_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_rating(raw: &str) -> Result<Option<RatingFilter>, FacetError> {
    match facet(raw) {
        None => Ok(None),
        Some(value) => match value.parse::<u8>() {
            Ok(n) if n <= 10 => Ok(Some(RatingFilter(n))),
            _ => Err(FacetError::new("rating", raw)),
        },
    }
}

fn parse_optional<T: FromStr<Err = FacetError>>(raw: &str) -> Result<Option<T>, FacetError> {
    facet(raw).map(|v| v.parse()).transpose()
}

/// Raw browse path segments as they appear in
/// `/browse-movies/{title}/{quality}/{genre}/{rating}/{order_by}/{year}/{language}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowseParams {
    pub title: String,
    pub quality: String,
    pub genre: String,
    pub rating: String,
    pub order_by: String,
    pub year: String,
    pub language: String,
}

/// Typed result of parsing [`BrowseParams`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseFacets {
    pub text: Option<String>,
    pub filters: MovieFilters,
    pub order_by: Option<OrderBy>,
}

impl BrowseParams {
    pub fn parse(&self) -> Result<BrowseFacets, FacetError> {
        let text = if self.title.trim() == NO_TITLE {
            None
        } else {
            search_text(&self.title)
        };

        Ok(BrowseFacets {
            text,
            filters: MovieFilters {
                quality: facet(&self.quality),
                genre: facet(&self.genre),
                language: facet(&self.language),
                rating: parse_rating(&self.rating)?,
                year: parse_optional(&self.year)?,
            },
            order_by: parse_optional(&self.order_by)?,
        })
    }
}
