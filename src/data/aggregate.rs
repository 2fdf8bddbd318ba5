use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::filter::filter;
use super::model::{FilterSpec, TrackRow, TrackTable};

/// How many entries the "top" tables keep.
pub const TOP_N: usize = 10;

/// Message shown in place of every chart when the filters match nothing.
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

/// Whisker reach of the duration box plot, in multiples of the IQR.
const WHISKER_IQR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Derived table rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTrackCount {
    pub release_year: i32,
    pub track_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistCount {
    pub artist_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongCount {
    pub track_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistFollowers {
    pub name: String,
    pub num_followers: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTopTrack {
    pub release_year: i32,
    pub track_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTopPlaylist {
    pub release_year: i32,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTopPlaylistFollowers {
    pub release_year: i32,
    pub name: String,
    pub num_followers: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearFollowers {
    pub release_year: i32,
    pub total_followers: u64,
}

/// Box-plot summary of track durations (minutes) for one playlist.
///
/// Whiskers reach the most extreme durations within 1.5 × IQR of the
/// quartiles; anything beyond them is listed in `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationBox {
    pub name: String,
    pub count: usize,
    pub min: f64,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub max: f64,
    pub outliers: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

/// The eight tables feeding the dashboard charts, in chart order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedTables {
    pub release_year_distribution: Vec<YearTrackCount>,
    pub top_artists: Vec<ArtistCount>,
    pub top_songs: Vec<SongCount>,
    pub top_playlists_by_followers: Vec<PlaylistFollowers>,
    pub most_popular_track_each_year: Vec<YearTopTrack>,
    pub most_popular_playlist_each_year: Vec<YearTopPlaylist>,
    pub most_popular_playlist_each_year_followers: Vec<YearTopPlaylistFollowers>,
    pub followers_per_year: Vec<YearFollowers>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dashboard {
    /// The filters matched no rows; nothing was aggregated.
    NoData,
    Charts {
        derived: Box<DerivedTables>,
        duration_by_playlist: Vec<DurationBox>,
    },
}

/// Filter `table` with `spec` and aggregate the result.
///
/// Returns [`Dashboard::NoData`] without running any aggregation when the
/// filtered table is empty.
pub fn run_pipeline(table: &TrackTable, spec: &FilterSpec) -> Dashboard {
    let filtered = filter(table, spec);
    log::debug!(
        "{} of {} rows match {:?}",
        filtered.len(),
        table.len(),
        spec
    );
    summarize(&filtered)
}

/// Aggregate an already filtered table, or produce [`Dashboard::NoData`] if
/// it is empty.
pub fn summarize(filtered: &TrackTable) -> Dashboard {
    if filtered.is_empty() {
        log::debug!("filters matched nothing, skipping aggregation");
        return Dashboard::NoData;
    }

    Dashboard::Charts {
        derived: Box::new(aggregate(filtered)),
        duration_by_playlist: duration_by_playlist(filtered),
    }
}

/// Compute all eight derived tables from an already filtered table.
pub fn aggregate(table: &TrackTable) -> DerivedTables {
    DerivedTables {
        release_year_distribution: release_year_distribution(table),
        top_artists: top_artists(table),
        top_songs: top_songs(table),
        top_playlists_by_followers: top_playlists_by_followers(table),
        most_popular_track_each_year: most_popular_track_each_year(table),
        most_popular_playlist_each_year: most_popular_playlist_each_year(table),
        most_popular_playlist_each_year_followers: most_popular_playlist_each_year_followers(
            table,
        ),
        followers_per_year: followers_per_year(table),
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Rows per release year, most frequent year first (ties: earlier year first).
pub fn release_year_distribution(table: &TrackTable) -> Vec<YearTrackCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for row in table.rows() {
        *counts.entry(row.release_year).or_default() += 1;
    }
    let mut out: Vec<YearTrackCount> = counts
        .into_iter()
        .map(|(release_year, track_count)| YearTrackCount {
            release_year,
            track_count,
        })
        .collect();
    out.sort_by(|a, b| b.track_count.cmp(&a.track_count));
    out
}

/// The [`TOP_N`] artists with the most rows.
pub fn top_artists(table: &TrackTable) -> Vec<ArtistCount> {
    top_counts(table, |row| row.artist_name.as_str())
        .into_iter()
        .map(|(artist_name, count)| ArtistCount {
            artist_name: artist_name.to_string(),
            count,
        })
        .collect()
}

/// The [`TOP_N`] track names with the most rows.
pub fn top_songs(table: &TrackTable) -> Vec<SongCount> {
    top_counts(table, |row| row.track_name.as_str())
        .into_iter()
        .map(|(track_name, count)| SongCount {
            track_name: track_name.to_string(),
            count,
        })
        .collect()
}

/// The [`TOP_N`] playlists by their largest observed follower count.
pub fn top_playlists_by_followers(table: &TrackTable) -> Vec<PlaylistFollowers> {
    let mut max_followers: BTreeMap<&str, u64> = BTreeMap::new();
    for row in table.rows() {
        let entry = max_followers.entry(row.name.as_str()).or_default();
        *entry = (*entry).max(row.num_followers);
    }
    let mut out: Vec<PlaylistFollowers> = max_followers
        .into_iter()
        .map(|(name, num_followers)| PlaylistFollowers {
            name: name.to_string(),
            num_followers,
        })
        .collect();
    // stable: equal counts stay in name order
    out.sort_by(|a, b| b.num_followers.cmp(&a.num_followers));
    out.truncate(TOP_N);
    out
}

/// For every release year, the track name occurring in the most rows.
pub fn most_popular_track_each_year(table: &TrackTable) -> Vec<YearTopTrack> {
    most_frequent_per_year(table, |row| row.track_name.as_str())
        .into_iter()
        .map(|(release_year, track_name, count)| YearTopTrack {
            release_year,
            track_name: track_name.to_string(),
            count,
        })
        .collect()
}

/// For every release year, the playlist occurring in the most rows.
pub fn most_popular_playlist_each_year(table: &TrackTable) -> Vec<YearTopPlaylist> {
    most_frequent_per_year(table, |row| row.name.as_str())
        .into_iter()
        .map(|(release_year, name, count)| YearTopPlaylist {
            release_year,
            name: name.to_string(),
            count,
        })
        .collect()
}

/// For every release year, the row with the most playlist followers.
///
/// Ties go to the row that comes first in the table.
pub fn most_popular_playlist_each_year_followers(
    table: &TrackTable,
) -> Vec<YearTopPlaylistFollowers> {
    let mut best: BTreeMap<i32, &TrackRow> = BTreeMap::new();
    for row in table.rows() {
        let current = best.entry(row.release_year).or_insert(row);
        if row.num_followers > current.num_followers {
            *current = row;
        }
    }
    best.into_values()
        .map(|row| YearTopPlaylistFollowers {
            release_year: row.release_year,
            name: row.name.clone(),
            num_followers: row.num_followers,
        })
        .collect()
}

/// Raw sum of `num_followers` per release year.
///
/// Playlists appearing on several rows are counted once per row.
pub fn followers_per_year(table: &TrackTable) -> Vec<YearFollowers> {
    let mut totals: BTreeMap<i32, u64> = BTreeMap::new();
    for row in table.rows() {
        *totals.entry(row.release_year).or_default() += row.num_followers;
    }
    totals
        .into_iter()
        .map(|(release_year, total_followers)| YearFollowers {
            release_year,
            total_followers,
        })
        .collect()
}

/// Track duration distribution per playlist, ordered by playlist name.
pub fn duration_by_playlist(table: &TrackTable) -> Vec<DurationBox> {
    let mut durations: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        durations
            .entry(row.name.as_str())
            .or_default()
            .push(row.track_duration_m);
    }
    durations
        .into_iter()
        .map(|(name, mut values)| {
            values.sort_by(f64::total_cmp);
            let q1 = quantile(&values, 0.25);
            let q3 = quantile(&values, 0.75);
            let reach = WHISKER_IQR * (q3 - q1);
            let (low_fence, high_fence) = (q1 - reach, q3 + reach);
            // q1 and q3 lie inside the fences, so both searches find a value
            let lower_whisker = values
                .iter()
                .copied()
                .find(|v| *v >= low_fence)
                .unwrap_or(q1);
            let upper_whisker = values
                .iter()
                .rev()
                .copied()
                .find(|v| *v <= high_fence)
                .unwrap_or(q3);
            let outliers = values
                .iter()
                .copied()
                .filter(|v| *v < low_fence || *v > high_fence)
                .collect();
            DurationBox {
                name: name.to_string(),
                count: values.len(),
                min: values[0],
                lower_whisker,
                q1,
                median: quantile(&values, 0.5),
                q3,
                upper_whisker,
                max: values[values.len() - 1],
                outliers,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Count rows per key, most frequent first, keeping first-seen order on ties,
/// truncated to [`TOP_N`].
fn top_counts<'a, F>(table: &'a TrackTable, key: F) -> Vec<(&'a str, usize)>
where
    F: Fn(&'a TrackRow) -> &'a str,
{
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for row in table.rows() {
        let k = key(row);
        match position.get(k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(k, counts.len());
                counts.push((k, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_N);
    counts
}

/// Count rows per (release_year, key) and keep the most frequent key of each
/// year. Count ties go to the lexicographically smallest key.
fn most_frequent_per_year<'a, F>(table: &'a TrackTable, key: F) -> Vec<(i32, &'a str, usize)>
where
    F: Fn(&'a TrackRow) -> &'a str,
{
    let mut counts: BTreeMap<(i32, &str), usize> = BTreeMap::new();
    for row in table.rows() {
        *counts.entry((row.release_year, key(row))).or_default() += 1;
    }

    let mut best: Vec<(i32, &str, usize)> = Vec::new();
    for ((year, k), count) in counts {
        match best.last_mut() {
            Some(last) if last.0 == year => {
                if count > last.2 {
                    *last = (year, k, count);
                }
            }
            _ => best.push((year, k, count)),
        }
    }
    best
}

/// Linearly interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{row, scenario_table};
    use approx::assert_relative_eq;

    fn all_years() -> FilterSpec {
        FilterSpec {
            artist: None,
            playlist: None,
            year_min: 2015,
            year_max: 2016,
        }
    }

    fn charts(dashboard: Dashboard) -> DerivedTables {
        match dashboard {
            Dashboard::Charts { derived, .. } => *derived,
            Dashboard::NoData => panic!("expected charts"),
        }
    }

    #[test]
    fn test_scenario_unfiltered() {
        let derived = charts(run_pipeline(&scenario_table(), &all_years()));

        assert_eq!(
            derived.followers_per_year,
            vec![
                YearFollowers { release_year: 2015, total_followers: 200 },
                YearFollowers { release_year: 2016, total_followers: 200 },
            ]
        );
        assert_eq!(
            derived.most_popular_track_each_year,
            vec![
                YearTopTrack { release_year: 2015, track_name: "T1".into(), count: 1 },
                YearTopTrack { release_year: 2016, track_name: "T3".into(), count: 1 },
            ]
        );
        assert_eq!(
            derived.top_artists,
            vec![
                ArtistCount { artist_name: "A".into(), count: 2 },
                ArtistCount { artist_name: "B".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_scenario_artist_filter() {
        let spec = FilterSpec {
            artist: Some("A".to_string()),
            ..all_years()
        };
        let derived = charts(run_pipeline(&scenario_table(), &spec));
        assert_eq!(
            derived.followers_per_year,
            vec![YearFollowers { release_year: 2015, total_followers: 200 }]
        );
    }

    #[test]
    fn test_empty_filter_returns_no_data() {
        let spec = FilterSpec {
            playlist: Some("missing".to_string()),
            ..all_years()
        };
        assert_eq!(run_pipeline(&scenario_table(), &spec), Dashboard::NoData);
    }

    #[test]
    fn test_pipeline_is_referentially_transparent() {
        let table = scenario_table();
        let spec = all_years();
        assert_eq!(run_pipeline(&table, &spec), run_pipeline(&table, &spec));
        assert_eq!(aggregate(&table), aggregate(&table));
    }

    #[test]
    fn test_release_year_distribution_orders_by_count() {
        let table = TrackTable::from_rows(vec![
            row("A", "P", "T1", 2016, 3.0, 1),
            row("A", "P", "T2", 2014, 3.0, 1),
            row("A", "P", "T3", 2016, 3.0, 1),
            row("A", "P", "T4", 2012, 3.0, 1),
        ]);
        assert_eq!(
            release_year_distribution(&table),
            vec![
                YearTrackCount { release_year: 2016, track_count: 2 },
                YearTrackCount { release_year: 2012, track_count: 1 },
                YearTrackCount { release_year: 2014, track_count: 1 },
            ]
        );
    }

    #[test]
    fn test_top_artists_truncates_to_top_n() {
        let mut rows = Vec::new();
        // artist i appears i + 1 times, 12 artists in total
        for i in 0..12 {
            for _ in 0..=i {
                rows.push(row(&format!("artist{i:02}"), "P", "T", 2015, 3.0, 1));
            }
        }
        let table = TrackTable::from_rows(rows);
        let top = top_artists(&table);

        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].artist_name, "artist11");
        assert_eq!(top[0].count, 12);

        let smallest_kept = top.iter().map(|a| a.count).min().unwrap();
        let kept: Vec<&str> = top.iter().map(|a| a.artist_name.as_str()).collect();
        for i in 0..12 {
            let name = format!("artist{i:02}");
            if !kept.contains(&name.as_str()) {
                assert!(i < smallest_kept, "{name} should have been kept");
            }
        }
    }

    #[test]
    fn test_top_songs_ties_keep_first_seen_order() {
        let table = TrackTable::from_rows(vec![
            row("A", "P", "Zebra", 2015, 3.0, 1),
            row("A", "P", "Apple", 2015, 3.0, 1),
            row("A", "P", "Mango", 2015, 3.0, 1),
            row("A", "P", "Mango", 2015, 3.0, 1),
        ]);
        let names: Vec<String> = top_songs(&table).into_iter().map(|s| s.track_name).collect();
        assert_eq!(names, vec!["Mango", "Zebra", "Apple"]);
    }

    #[test]
    fn test_top_playlists_use_max_follower_snapshot() {
        let table = TrackTable::from_rows(vec![
            row("A", "Chill", "T1", 2015, 3.0, 50),
            row("A", "Chill", "T2", 2015, 3.0, 500),
            row("A", "Rock", "T3", 2015, 3.0, 300),
            row("A", "Rock", "T4", 2015, 3.0, 300),
        ]);
        assert_eq!(
            top_playlists_by_followers(&table),
            vec![
                PlaylistFollowers { name: "Chill".into(), num_followers: 500 },
                PlaylistFollowers { name: "Rock".into(), num_followers: 300 },
            ]
        );
    }

    #[test]
    fn test_top_playlists_truncated() {
        let rows = (0..15)
            .map(|i| row("A", &format!("P{i:02}"), "T", 2015, 3.0, i))
            .collect();
        let top = top_playlists_by_followers(&TrackTable::from_rows(rows));
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].name, "P14");
        assert_eq!(top[9].name, "P05");
    }

    #[test]
    fn test_top_playlists_equal_followers_ordered_by_name() {
        let table = TrackTable::from_rows(vec![
            row("A", "Zed", "T1", 2015, 3.0, 300),
            row("A", "Alpha", "T2", 2015, 3.0, 300),
            row("A", "Mid", "T3", 2015, 3.0, 500),
        ]);
        let names: Vec<String> = top_playlists_by_followers(&table)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zed"]);
    }

    #[test]
    fn test_top_playlists_tie_at_cut_keeps_smallest_name() {
        // nine clear leaders, then two playlists tied for the last slot
        let mut rows: Vec<TrackRow> = (0..9)
            .map(|i| row("A", &format!("Lead{i}"), "T", 2015, 3.0, 1000 + i))
            .collect();
        rows.push(row("A", "Tie B", "T", 2015, 3.0, 10));
        rows.push(row("A", "Tie A", "T", 2015, 3.0, 10));
        let top = top_playlists_by_followers(&TrackTable::from_rows(rows));
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].name, "Lead8");
        assert_eq!(top[9], PlaylistFollowers { name: "Tie A".into(), num_followers: 10 });
        assert!(top.iter().all(|p| p.name != "Tie B"));
    }

    #[test]
    fn test_most_popular_track_each_year_uses_true_maximum() {
        let table = TrackTable::from_rows(vec![
            row("A", "P", "Low", 2015, 3.0, 1),
            row("A", "P", "High", 2015, 3.0, 1),
            row("B", "Q", "High", 2015, 3.0, 1),
            row("B", "Q", "High", 2015, 3.0, 1),
            row("A", "P", "Low", 2016, 3.0, 1),
            row("A", "P", "Other", 2017, 3.0, 1),
        ]);
        let result = most_popular_track_each_year(&table);
        assert_eq!(
            result,
            vec![
                YearTopTrack { release_year: 2015, track_name: "High".into(), count: 3 },
                YearTopTrack { release_year: 2016, track_name: "Low".into(), count: 1 },
                YearTopTrack { release_year: 2017, track_name: "Other".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_most_popular_ties_pick_smallest_name() {
        let table = TrackTable::from_rows(vec![
            row("A", "Zed", "T", 2015, 3.0, 1),
            row("A", "Alpha", "T", 2015, 3.0, 1),
        ]);
        assert_eq!(
            most_popular_playlist_each_year(&table),
            vec![YearTopPlaylist { release_year: 2015, name: "Alpha".into(), count: 1 }]
        );
    }

    #[test]
    fn test_most_followed_playlist_each_year() {
        let table = TrackTable::from_rows(vec![
            row("A", "First", "T1", 2015, 3.0, 900),
            row("A", "Second", "T2", 2015, 3.0, 900),
            row("A", "Small", "T3", 2015, 3.0, 10),
            row("A", "Small", "T4", 2016, 3.0, 10),
            row("A", "Big", "T5", 2016, 3.0, 20),
        ]);
        assert_eq!(
            most_popular_playlist_each_year_followers(&table),
            vec![
                YearTopPlaylistFollowers { release_year: 2015, name: "First".into(), num_followers: 900 },
                YearTopPlaylistFollowers { release_year: 2016, name: "Big".into(), num_followers: 20 },
            ]
        );
    }

    #[test]
    fn test_followers_per_year_is_raw_sum() {
        let table = TrackTable::from_rows(vec![
            row("A", "P", "T1", 2015, 3.0, 7),
            row("A", "P", "T2", 2015, 3.0, 7),
            row("A", "Q", "T3", 2015, 3.0, 11),
            row("A", "Q", "T4", 2020, 3.0, 5),
        ]);
        let totals = followers_per_year(&table);
        for entry in &totals {
            let expected: u64 = table
                .rows()
                .iter()
                .filter(|r| r.release_year == entry.release_year)
                .map(|r| r.num_followers)
                .sum();
            assert_eq!(entry.total_followers, expected);
        }
        assert_eq!(totals[0].total_followers, 25);
    }

    #[test]
    fn test_duration_by_playlist_quartiles() {
        let table = TrackTable::from_rows(vec![
            row("A", "P", "T1", 2015, 4.0, 1),
            row("A", "P", "T2", 2015, 1.0, 1),
            row("A", "P", "T3", 2015, 3.0, 1),
            row("A", "P", "T4", 2015, 2.0, 1),
            row("A", "Q", "T5", 2015, 2.5, 1),
        ]);
        let boxes = duration_by_playlist(&table);
        assert_eq!(boxes.len(), 2);

        let p = &boxes[0];
        assert_eq!(p.name, "P");
        assert_eq!(p.count, 4);
        assert_relative_eq!(p.min, 1.0);
        assert_relative_eq!(p.q1, 1.75);
        assert_relative_eq!(p.median, 2.5);
        assert_relative_eq!(p.q3, 3.25);
        assert_relative_eq!(p.max, 4.0);
        assert_relative_eq!(p.lower_whisker, 1.0);
        assert_relative_eq!(p.upper_whisker, 4.0);
        assert!(p.outliers.is_empty());

        let q = &boxes[1];
        assert_relative_eq!(q.min, 2.5);
        assert_relative_eq!(q.median, 2.5);
        assert_relative_eq!(q.max, 2.5);
    }

    #[test]
    fn test_duration_whiskers_stop_at_one_and_a_half_iqr() {
        let table = TrackTable::from_rows(
            [3.0, 3.2, 3.4, 3.6, 3.8, 12.0, 0.5]
                .into_iter()
                .enumerate()
                .map(|(i, d)| row("A", "P", &format!("T{i}"), 2015, d, 1))
                .collect(),
        );
        let p = &duration_by_playlist(&table)[0];
        // sorted: 0.5 3.0 3.2 3.4 3.6 3.8 12.0 -> q1 3.1, q3 3.7, fences 2.2 and 4.6
        assert_relative_eq!(p.q1, 3.1, epsilon = 1e-9);
        assert_relative_eq!(p.q3, 3.7, epsilon = 1e-9);
        assert_relative_eq!(p.lower_whisker, 3.0);
        assert_relative_eq!(p.upper_whisker, 3.8);
        assert_eq!(p.outliers, vec![0.5, 12.0]);
        assert_relative_eq!(p.min, 0.5);
        assert_relative_eq!(p.max, 12.0);
    }

    #[test]
    fn test_no_data_serializes_with_status_tag() {
        let json = serde_json::to_value(Dashboard::NoData).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "no_data" }));
    }

    #[test]
    fn test_charts_serialize_column_names() {
        let json = serde_json::to_value(run_pipeline(&scenario_table(), &all_years())).unwrap();
        assert_eq!(json["status"], "charts");
        assert_eq!(
            json["derived"]["release_year_distribution"][0],
            serde_json::json!({ "release_year": 2015, "track_count": 2 })
        );
        assert_eq!(
            json["derived"]["followers_per_year"][1],
            serde_json::json!({ "release_year": 2016, "total_followers": 200 })
        );
    }
}
