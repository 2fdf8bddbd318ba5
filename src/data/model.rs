use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// TrackRow – one (track, playlist) association
// ---------------------------------------------------------------------------

/// A single track-in-playlist record from the source table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRow {
    pub artist_name: String,
    /// Playlist name.
    pub name: String,
    pub track_name: String,
    pub release_year: i32,
    /// Track duration in minutes.
    pub track_duration_m: f64,
    /// Playlist follower count at snapshot time.
    pub num_followers: u64,
}

// ---------------------------------------------------------------------------
// TrackTable – the loaded (or filtered) table
// ---------------------------------------------------------------------------

/// An ordered collection of rows with pre-computed selector indices.
///
/// Tables are never mutated once built; filtering produces a new table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackTable {
    rows: Vec<TrackRow>,
    /// Sorted distinct artist names.
    artists: BTreeSet<String>,
    /// Sorted distinct playlist names.
    playlists: BTreeSet<String>,
    /// Smallest and largest release year, `None` for an empty table.
    year_bounds: Option<(i32, i32)>,
}

impl TrackTable {
    /// Build the selector indices from the given rows.
    pub fn from_rows(rows: Vec<TrackRow>) -> Self {
        let mut artists = BTreeSet::new();
        let mut playlists = BTreeSet::new();
        let mut year_bounds: Option<(i32, i32)> = None;

        for row in &rows {
            if !artists.contains(&row.artist_name) {
                artists.insert(row.artist_name.clone());
            }
            if !playlists.contains(&row.name) {
                playlists.insert(row.name.clone());
            }
            year_bounds = Some(match year_bounds {
                Some((lo, hi)) => (lo.min(row.release_year), hi.max(row.release_year)),
                None => (row.release_year, row.release_year),
            });
        }

        TrackTable {
            rows,
            artists,
            playlists,
            year_bounds,
        }
    }

    pub fn rows(&self) -> &[TrackRow] {
        &self.rows
    }

    pub fn artists(&self) -> &BTreeSet<String> {
        &self.artists
    }

    pub fn playlists(&self) -> &BTreeSet<String> {
        &self.playlists
    }

    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – the user's current selection
// ---------------------------------------------------------------------------

/// Year range the dashboard starts with when nothing else is requested.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2011, 2017);

/// Artist / playlist / inclusive year-range selection.
///
/// `None` for artist or playlist means "All".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub artist: Option<String>,
    pub playlist: Option<String>,
    pub year_min: i32,
    pub year_max: i32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            artist: None,
            playlist: None,
            year_min: DEFAULT_YEAR_RANGE.0,
            year_max: DEFAULT_YEAR_RANGE.1,
        }
    }
}

impl FilterSpec {
    /// Whether `row` satisfies all three predicates.
    pub fn matches(&self, row: &TrackRow) -> bool {
        if let Some(artist) = &self.artist {
            if row.artist_name != *artist {
                return false;
            }
        }
        if let Some(playlist) = &self.playlist {
            if row.name != *playlist {
                return false;
            }
        }
        self.year_min <= row.release_year && row.release_year <= self.year_max
    }

    /// Clamp the year range into `bounds`.
    ///
    /// Falls back to the full `bounds` when the clamped range would be inverted.
    pub fn clamp_years(&mut self, bounds: (i32, i32)) {
        let (lo, hi) = bounds;
        let min = self.year_min.clamp(lo, hi);
        let max = self.year_max.clamp(lo, hi);
        if min > max {
            self.year_min = lo;
            self.year_max = hi;
        } else {
            self.year_min = min;
            self.year_max = max;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(
        artist: &str,
        playlist: &str,
        track: &str,
        year: i32,
        duration: f64,
        followers: u64,
    ) -> TrackRow {
        TrackRow {
            artist_name: artist.to_string(),
            name: playlist.to_string(),
            track_name: track.to_string(),
            release_year: year,
            track_duration_m: duration,
            num_followers: followers,
        }
    }

    /// The three-row scenario used throughout the pipeline tests.
    pub(crate) fn scenario_table() -> TrackTable {
        TrackTable::from_rows(vec![
            row("A", "P1", "T1", 2015, 3.0, 100),
            row("A", "P1", "T2", 2015, 4.0, 100),
            row("B", "P2", "T3", 2016, 3.5, 200),
        ])
    }

    #[test]
    fn test_indices_built_from_rows() {
        let table = scenario_table();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.artists().iter().collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(
            table.playlists().iter().collect::<Vec<_>>(),
            vec!["P1", "P2"]
        );
        assert_eq!(table.year_bounds(), Some((2015, 2016)));
    }

    #[test]
    fn test_empty_table_has_no_bounds() {
        let table = TrackTable::from_rows(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.year_bounds(), None);
    }

    #[test]
    fn test_matches_is_case_sensitive() {
        let spec = FilterSpec {
            artist: Some("a".to_string()),
            playlist: None,
            year_min: 2000,
            year_max: 2020,
        };
        assert!(!spec.matches(&row("A", "P1", "T1", 2015, 3.0, 1)));
        assert!(spec.matches(&row("a", "P1", "T1", 2015, 3.0, 1)));
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let spec = FilterSpec {
            year_min: 2015,
            year_max: 2016,
            ..FilterSpec::default()
        };
        assert!(spec.matches(&row("A", "P", "T", 2015, 1.0, 1)));
        assert!(spec.matches(&row("A", "P", "T", 2016, 1.0, 1)));
        assert!(!spec.matches(&row("A", "P", "T", 2014, 1.0, 1)));
        assert!(!spec.matches(&row("A", "P", "T", 2017, 1.0, 1)));
    }

    #[test]
    fn test_clamp_years_inside_bounds() {
        let mut spec = FilterSpec::default();
        spec.clamp_years((2013, 2020));
        assert_eq!((spec.year_min, spec.year_max), (2013, 2017));
    }

    #[test]
    fn test_clamp_years_collapses_onto_nearest_bound() {
        let mut spec = FilterSpec::default();
        spec.clamp_years((1990, 1999));
        assert_eq!((spec.year_min, spec.year_max), (1999, 1999));
    }

    #[test]
    fn test_clamp_years_inverted_range_falls_back_to_bounds() {
        let mut inverted = FilterSpec {
            year_min: 2010,
            year_max: 2000,
            ..FilterSpec::default()
        };
        inverted.clamp_years((2001, 2009));
        assert_eq!((inverted.year_min, inverted.year_max), (2001, 2009));
    }
}
