use crate::data::aggregate::{summarize, Dashboard};
use crate::data::filter::filter;
use crate::data::model::{FilterSpec, TrackTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded source table (None until user loads a file). Never mutated.
    pub table: Option<TrackTable>,

    /// Current artist / playlist / year selection.
    pub spec: FilterSpec,

    /// Rows passing the current selection.
    pub filtered: TrackTable,

    /// Latest pipeline output for `spec`.
    pub dashboard: Option<Dashboard>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start with `initial` as the selection; it is applied once a table is loaded.
    pub fn new(initial: FilterSpec) -> Self {
        Self {
            spec: initial,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded table, fit the year range to it and recompute.
    ///
    /// Artist and playlist selections that don't exist in the new table are
    /// reset to "All".
    pub fn set_table(&mut self, table: TrackTable) {
        if let Some(bounds) = table.year_bounds() {
            self.spec.clamp_years(bounds);
        }
        if let Some(artist) = &self.spec.artist {
            if !table.artists().contains(artist) {
                log::warn!("artist {artist:?} not in data, showing all artists");
                self.spec.artist = None;
            }
        }
        if let Some(playlist) = &self.spec.playlist {
            if !table.playlists().contains(playlist) {
                log::warn!("playlist {playlist:?} not in data, showing all playlists");
                self.spec.playlist = None;
            }
        }

        self.table = Some(table);
        self.status_message = None;
        self.recompute();
    }

    /// Rerun the filter and aggregation for the current selection.
    pub fn recompute(&mut self) {
        if let Some(table) = &self.table {
            self.filtered = filter(table, &self.spec);
            self.dashboard = Some(summarize(&self.filtered));
        }
    }

    pub fn set_artist(&mut self, artist: Option<String>) {
        if self.spec.artist != artist {
            self.spec.artist = artist;
            self.recompute();
        }
    }

    pub fn set_playlist(&mut self, playlist: Option<String>) {
        if self.spec.playlist != playlist {
            self.spec.playlist = playlist;
            self.recompute();
        }
    }

    /// Set both ends of the year range, keeping `year_min <= year_max` by
    /// moving whichever end was not `anchor_min`'s.
    pub fn set_years(&mut self, year_min: i32, year_max: i32, anchor_min: bool) {
        let (year_min, year_max) = match (year_min > year_max, anchor_min) {
            (true, true) => (year_min, year_min),
            (true, false) => (year_max, year_max),
            (false, _) => (year_min, year_max),
        };
        if (self.spec.year_min, self.spec.year_max) != (year_min, year_max) {
            self.spec.year_min = year_min;
            self.spec.year_max = year_max;
            self.recompute();
        }
    }
}
