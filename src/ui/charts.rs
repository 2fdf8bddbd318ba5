use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

use crate::color::{generate_palette, viridis, viridis_at, ColorMap};
use crate::data::aggregate::{Dashboard, DerivedTables, DurationBox, NO_DATA_MESSAGE};
use crate::data::model::TrackTable;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every chart for the latest pipeline result, or the "no data"
/// message in place of all of them.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let dashboard = match &state.dashboard {
        Some(d) => d,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view the dashboard  (File → Open…)");
            });
            return;
        }
    };

    let (derived, durations) = match dashboard {
        Dashboard::NoData => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(NO_DATA_MESSAGE);
            });
            return;
        }
        Dashboard::Charts {
            derived,
            duration_by_playlist,
        } => (derived.as_ref(), duration_by_playlist.as_slice()),
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Spotify Dashboard");
            ui.add_space(8.0);
            derived_charts(ui, derived);

            section(ui, "Track Duration Distribution by Playlist");
            duration_boxes(ui, durations);

            ui.add_space(12.0);
            egui::CollapsingHeader::new(format!("Filtered rows ({})", state.filtered.len()))
                .default_open(false)
                .show(ui, |ui: &mut Ui| rows_table(ui, &state.filtered));
        });
}

/// The eight derived tables, in pipeline order.
fn derived_charts(ui: &mut Ui, derived: &DerivedTables) {
    section(ui, "Distribution of Tracks by Release Year");
    let slices: Vec<(String, f64)> = derived
        .release_year_distribution
        .iter()
        .map(|e| (e.release_year.to_string(), e.track_count as f64))
        .collect();
    pie_chart(ui, &slices);

    section(ui, "Top 10 Most Listened to Artists");
    let entries: Vec<(String, f64)> = derived
        .top_artists
        .iter()
        .map(|e| (e.artist_name.clone(), e.count as f64))
        .collect();
    ranked_bars(ui, "top_artists", "Count", &entries);

    section(ui, "Top 10 Most Listened to Songs");
    let entries: Vec<(String, f64)> = derived
        .top_songs
        .iter()
        .map(|e| (e.track_name.clone(), e.count as f64))
        .collect();
    ranked_bars(ui, "top_songs", "Count", &entries);

    section(ui, "Top 10 Playlists by Number of Followers");
    let entries: Vec<(String, f64)> = derived
        .top_playlists_by_followers
        .iter()
        .map(|e| (e.name.clone(), e.num_followers as f64))
        .collect();
    ranked_bars(ui, "top_playlists", "Number of Followers", &entries);

    section(ui, "Most Popular Track Each Year");
    let entries: Vec<(i32, &str, f64)> = derived
        .most_popular_track_each_year
        .iter()
        .map(|e| (e.release_year, e.track_name.as_str(), e.count as f64))
        .collect();
    yearly_bars(ui, "track_each_year", "Number of Plays", &entries);

    section(ui, "Most Popular Playlist Each Year");
    let entries: Vec<(i32, &str, f64)> = derived
        .most_popular_playlist_each_year
        .iter()
        .map(|e| (e.release_year, e.name.as_str(), e.count as f64))
        .collect();
    yearly_bars(ui, "playlist_each_year", "Number of Plays", &entries);

    section(ui, "Most Popular Playlist Each Year Based on Number of Followers");
    let entries: Vec<(i32, &str, f64)> = derived
        .most_popular_playlist_each_year_followers
        .iter()
        .map(|e| (e.release_year, e.name.as_str(), e.num_followers as f64))
        .collect();
    yearly_bars(ui, "playlist_each_year_followers", "Number of Followers", &entries);

    section(ui, "Spotify Activity by Year (Based on Number of Followers)");
    let totals: Vec<(i32, f64)> = derived
        .followers_per_year
        .iter()
        .map(|e| (e.release_year, e.total_followers as f64))
        .collect();
    year_bars(ui, "followers_per_year", "Total Followers", &totals);
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.label(RichText::new(title).strong().size(16.0));
}

// ---------------------------------------------------------------------------
// Pie chart (painted directly; egui_plot has no pie)
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, slices: &[(String, f64)]) {
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        ui.label("Nothing to show.");
        return;
    }
    let colors = generate_palette(slices.len());

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(CHART_HEIGHT), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        // start at twelve o'clock
        let mut start = -FRAC_PI_2;
        for ((_, value), color) in slices.iter().zip(&colors) {
            let sweep = (value / total) as f32 * TAU;
            for shape in wedge(center, radius, start, sweep, *color) {
                painter.add(shape);
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for ((label, value), color) in slices.iter().zip(&colors) {
                let pct = value / total * 100.0;
                ui.label(RichText::new(format!("■ {label}  {value}  ({pct:.1}%)")).color(*color));
            }
        });
    });
}

/// A pie wedge split into convex pieces of at most a quarter turn.
fn wedge(center: Pos2, radius: f32, start: f32, sweep: f32, color: Color32) -> Vec<Shape> {
    const STEPS: usize = 16;
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let piece = sweep / pieces as f32;

    (0..pieces)
        .map(|p| {
            let from = start + piece * p as f32;
            let mut points = Vec::with_capacity(STEPS + 2);
            points.push(center);
            for s in 0..=STEPS {
                let angle = from + piece * s as f32 / STEPS as f32;
                points.push(center + radius * Vec2::angled(angle));
            }
            Shape::convex_polygon(points, color, Stroke::NONE)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Horizontal bars, first entry on top, one legend entry per bar.
fn ranked_bars(ui: &mut Ui, id: &str, value_label: &str, entries: &[(String, f64)]) {
    let colors = viridis(entries.len());
    let n = entries.len();

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(value_label)
        .include_x(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (rank, ((label, value), color)) in entries.iter().zip(colors).enumerate() {
                let bar = Bar::new((n - rank) as f64, *value).name(label).width(0.8);
                plot_ui.bar_chart(BarChart::new(vec![bar]).horizontal().color(color).name(label));
            }
        });
}

/// One bar per year, coloured by the category that won the year.
fn yearly_bars(ui: &mut Ui, id: &str, value_label: &str, entries: &[(i32, &str, f64)]) {
    let colors = ColorMap::new(entries.iter().map(|(_, label, _)| *label));

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Release Year")
        .y_axis_label(value_label)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (year, label, value) in entries {
                let bar = Bar::new(*year as f64, *value)
                    .name(format!("{year}: {label}"))
                    .width(0.8);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .color(colors.color_for(label))
                        .name(label),
                );
            }
        });
}

/// One bar per year, shaded by value.
fn year_bars(ui: &mut Ui, id: &str, value_label: &str, entries: &[(i32, f64)]) {
    let max = entries.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let bars: Vec<Bar> = entries
        .iter()
        .map(|(year, value)| {
            let t = if max > 0.0 { (value / max) as f32 } else { 0.0 };
            Bar::new(*year as f64, *value)
                .name(year)
                .width(0.8)
                .fill(viridis_at(t))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Release Year")
        .y_axis_label(value_label)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(value_label));
        });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

fn duration_boxes(ui: &mut Ui, boxes: &[DurationBox]) {
    let colors = generate_palette(boxes.len());

    Plot::new("duration_by_playlist")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Playlist")
        .y_axis_label("Track Duration (min)")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (b, color)) in boxes.iter().zip(colors).enumerate() {
                let x = i as f64;
                let spread =
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker);
                let elem = BoxElem::new(x, spread)
                    .name(format!("{} ({} tracks)", b.name, b.count))
                    .box_width(0.6);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).color(color).name(&b.name));

                if !b.outliers.is_empty() {
                    let points: Vec<[f64; 2]> = b.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(points).color(color).radius(3.0));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Filtered rows
// ---------------------------------------------------------------------------

const ROW_HEADERS: [&str; 6] = [
    "Artist",
    "Playlist",
    "Track",
    "Release Year",
    "Duration (min)",
    "Followers",
];

fn rows_table(ui: &mut Ui, table: &TrackTable) {
    let rows = table.rows();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(60.0), ROW_HEADERS.len())
        .header(20.0, |mut header| {
            for title in ROW_HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui| {
                    ui.label(r.artist_name.as_str());
                });
                row.col(|ui| {
                    ui.label(r.name.as_str());
                });
                row.col(|ui| {
                    ui.label(r.track_name.as_str());
                });
                row.col(|ui| {
                    ui.label(r.release_year.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.track_duration_m));
                });
                row.col(|ui| {
                    ui.label(r.num_followers.to_string());
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedge_splits_large_sweeps() {
        let center = Pos2::new(0.0, 0.0);
        assert_eq!(wedge(center, 10.0, 0.0, 0.5, Color32::RED).len(), 1);
        assert_eq!(wedge(center, 10.0, 0.0, TAU, Color32::RED).len(), 4);
    }

    #[test]
    fn test_wedge_points_lie_on_radius() {
        let center = Pos2::new(5.0, 5.0);
        for shape in wedge(center, 10.0, 0.0, 1.0, Color32::RED) {
            let Shape::Path(path) = shape else {
                panic!("expected a path shape");
            };
            assert_eq!(path.points[0], center);
            for p in &path.points[1..] {
                assert!(((*p - center).length() - 10.0).abs() < 1e-3);
            }
        }
    }
}
