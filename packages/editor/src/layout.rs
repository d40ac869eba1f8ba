//! # Layout Bookkeeping
//!
//! Widths are integers on a 12-unit grid. Sibling column widths are flex
//! shares and need not add up to 12; sections wider than what is left on the
//! current grid row wrap to the next one. Nothing here positions pixels.

use pagecraft_model::page::GRID_UNITS;
use pagecraft_model::{Column, GridWidth, Section};

/// Sum of widths in grid units
pub fn total_width<I>(widths: I) -> u32
where
    I: IntoIterator<Item = GridWidth>,
{
    widths.into_iter().map(|w| w.get() as u32).sum()
}

/// Share of the row each column takes, in 0.0..=1.0
pub fn column_fractions(columns: &[Column]) -> Vec<f64> {
    let total = total_width(columns.iter().map(|c| c.width));
    if total == 0 {
        return Vec::new();
    }

    columns
        .iter()
        .map(|c| c.width.get() as f64 / total as f64)
        .collect()
}

/// Column shares scaled to whole grid units.
///
/// Spans add up to 12 (largest remainder rounding) and each is at least 1.
/// With 12 or more columns every column gets a single unit.
pub fn column_spans(columns: &[Column]) -> Vec<u8> {
    let count = columns.len();
    if count == 0 {
        return Vec::new();
    }

    let units = GRID_UNITS as u32;
    if count as u32 >= units {
        return vec![1; count];
    }

    let total = total_width(columns.iter().map(|c| c.width));
    let mut spans = Vec::with_capacity(count);
    let mut remainders = Vec::with_capacity(count);

    for (index, column) in columns.iter().enumerate() {
        let scaled = column.width.get() as u32 * units;
        spans.push(scaled / total);
        remainders.push((scaled % total, index));
    }

    let mut leftover = units - spans.iter().sum::<u32>();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, index) in remainders {
        if leftover == 0 {
            break;
        }
        spans[index] += 1;
        leftover -= 1;
    }

    // Narrow columns can floor to zero; borrow a unit from the widest
    for index in 0..count {
        while spans[index] == 0 {
            let widest = (0..count).max_by_key(|&i| (spans[i], count - i)).unwrap_or(index);
            spans[widest] -= 1;
            spans[index] += 1;
        }
    }

    spans.into_iter().map(|s| s as u8).collect()
}

/// Group consecutive sections into grid rows of at most 12 units
pub fn section_rows(sections: &[Section]) -> Vec<&[Section]> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0u32;

    for (index, section) in sections.iter().enumerate() {
        let width = section.width.get() as u32;
        if used + width > GRID_UNITS as u32 && index > start {
            rows.push(&sections[start..index]);
            start = index;
            used = 0;
        }
        used += width;
    }

    if start < sections.len() {
        rows.push(&sections[start..]);
    }
    rows
}
