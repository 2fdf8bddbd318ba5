use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

/// Label of the "no filter" entry in the selection boxes.
const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let table = match &state.table {
        Some(table) => table,
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the scroll area.
    let artists: Vec<String> = table.artists().iter().cloned().collect();
    let playlists: Vec<String> = table.playlists().iter().cloned().collect();
    let bounds = table.year_bounds();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Select Artist");
            let mut artist = state.spec.artist.clone();
            selection_box(ui, "artist_select", &mut artist, &artists);
            state.set_artist(artist);
            ui.add_space(8.0);

            ui.strong("Select Playlist");
            let mut playlist = state.spec.playlist.clone();
            selection_box(ui, "playlist_select", &mut playlist, &playlists);
            state.set_playlist(playlist);
            ui.add_space(8.0);

            ui.strong("Select Release Year Range");
            if let Some((lo, hi)) = bounds {
                let mut year_min = state.spec.year_min;
                let mut year_max = state.spec.year_max;
                let min_changed = ui
                    .add(Slider::new(&mut year_min, lo..=hi).text("from"))
                    .changed();
                let max_changed = ui
                    .add(Slider::new(&mut year_max, lo..=hi).text("to"))
                    .changed();
                if min_changed || max_changed {
                    state.set_years(year_min, year_max, min_changed);
                }
            }
        });
}

/// Combo box offering "All" followed by every option.
fn selection_box(ui: &mut Ui, id: &str, selected: &mut Option<String>, options: &[String]) {
    let current = selected.as_deref().unwrap_or(ALL).to_string();
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(selected, None, ALL);
            for option in options {
                ui.selectable_value(selected, Some(option.clone()), option.as_str());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows loaded, {} matching",
                table.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open track data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => state.set_table(table),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
