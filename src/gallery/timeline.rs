use serde::Serialize;

use super::types::PageEntry;

/// A labelled tick on the timeline axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub year: i32,
    pub label: String,
    pub position: f64,
}

/// A painting placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker<'a> {
    pub page: &'a PageEntry,
    pub position: f64,
    /// Thumbnails alternate above and below the axis
    pub above: bool,
}

/// Horizontal position in percent. The axis is piecewise linear:
/// 1750-1850 spans 15-35 %, 1850-1945 spans 35-70 %, 1945-today spans 70-90 %.
pub fn timeline_position(year: i32, current_year: i32) -> f64 {
    let year = year as f64;
    if year < 1850.0 {
        15.0 + (year - 1750.0) / 100.0 * 20.0
    } else if year < 1945.0 {
        35.0 + (year - 1850.0) / 95.0 * 35.0
    } else {
        let span = (current_year - 1945).max(1) as f64;
        70.0 + (year - 1945.0) / span * 20.0
    }
}

pub fn ticks(current_year: i32) -> Vec<Tick> {
    [1750, 1800, 1850, 1945, 1989]
        .iter()
        .map(|&y| (y, y.to_string()))
        .chain(std::iter::once((current_year, "Heute".to_string())))
        .map(|(year, label)| Tick {
            year,
            label,
            position: timeline_position(year, current_year),
        })
        .collect()
}

pub fn markers(pages: &[PageEntry], current_year: i32) -> Vec<Marker<'_>> {
    let mut sorted: Vec<&PageEntry> = pages.iter().collect();
    sorted.sort_by_key(|p| p.year);
    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, page)| Marker {
            page,
            position: timeline_position(page.year, current_year),
            above: idx % 2 == 0,
        })
        .collect()
}
