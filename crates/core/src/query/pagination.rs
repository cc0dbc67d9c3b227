//! Page arithmetic for browse results.
//!
//! Pages are 1-based. A request below page 1 is clamped to 1; a request past
//! the last page is passed through untouched and simply yields no movies.

use std::num::NonZeroU32;

/// The page a request resolves to and how many pages exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    /// Displayed page count, never below 1.
    pub total_pages: u32,
}

/// `ceil(total_matches / page_size)`; zero for an empty result.
pub fn total_pages(total_matches: u64, page_size: NonZeroU32) -> u32 {
    let pages = total_matches.div_ceil(u64::from(page_size.get()));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Resolve the requested page against the number of matches.
pub fn paginate(total_matches: u64, page_size: NonZeroU32, requested_page: i64) -> PageWindow {
    PageWindow {
        page: clamp_page(requested_page),
        total_pages: total_pages(total_matches, page_size).max(1),
    }
}

/// Clamp a page number to the valid lower bound of 1.
pub fn clamp_page(requested_page: i64) -> u32 {
    if requested_page < 1 {
        1
    } else {
        u32::try_from(requested_page).unwrap_or(u32::MAX)
    }
}

/// Parse a `page` query parameter, falling back to 1 when it is missing,
/// not a number, or below 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(leading_integer).map(clamp_page).unwrap_or(1)
}

/// Read the leading integer of a string the way a lenient query parser
/// would: `"3"`, `" 3"`, `"+3"` and `"3abc"` all read as 3.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long inputs instead of rejecting them.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

/// Row offset of the first movie on `page`.
pub fn offset(page: u32, page_size: NonZeroU32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size.get())
}

/// Page numbers shown in the pagination bar: `current ± radius`, kept
/// within `1..=total_pages`.
pub fn page_links(total_pages: u32, current: u32, radius: u32) -> Vec<u32> {
    let total = total_pages.max(1);
    let current = current.clamp(1, total);
    let first = current.saturating_sub(radius).max(1);
    let last = current.saturating_add(radius).min(total);
    (first..=last).collect()
}
