use super::model::{FilterSpec, TrackTable};

// ---------------------------------------------------------------------------
// Filter stage
// ---------------------------------------------------------------------------

/// Return a new table holding the rows of `table` that pass every predicate
/// of `spec`, in their original order.
///
/// A row passes when:
/// * `spec.artist` is `None` or equals the row's `artist_name`
/// * `spec.playlist` is `None` or equals the row's playlist `name`
/// * `year_min <= release_year <= year_max`
///
/// An empty result is a valid outcome. An inverted year range simply matches
/// nothing.
pub fn filter(table: &TrackTable, spec: &FilterSpec) -> TrackTable {
    let rows = table
        .rows()
        .iter()
        .filter(|row| spec.matches(row))
        .cloned()
        .collect();
    TrackTable::from_rows(rows)
}
