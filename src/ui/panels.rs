use std::path::PathBuf;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, Ui};

use crate::dashboard::DashboardExport;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Shared category selector
// ---------------------------------------------------------------------------

/// Combo box over `options`. Returns `true` when the selection changed.
pub fn category_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &mut String,
    options: &[String],
) -> bool {
    let before = current.clone();
    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                ui.selectable_value(current, option.clone(), option.as_str());
            }
        });
    *current != before
}

// ---------------------------------------------------------------------------
// Left side panel – insights filters
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut changed = category_combo(
        ui,
        "neighbourhood_group_select",
        "🏡 Neighbourhood group",
        &mut state.insights_request.neighbourhood_group,
        state.dataset.neighbourhood_groups(),
    );
    ui.add_space(6.0);
    changed |= category_combo(
        ui,
        "room_type_select",
        "🛏 Room type",
        &mut state.insights_request.room_type,
        state.dataset.room_types(),
    );

    if changed {
        log::debug!(
            "insights selection: {} / {}",
            state.insights_request.neighbourhood_group,
            state.insights_request.room_type
        );
    }
    state.refresh_insights();

    ui.separator();
    ui.label(format!(
        "🔍 Showing data for {} in {}",
        state.insights_request.room_type, state.insights_request.neighbourhood_group
    ));
    ui.label(format!("{} matching listings", state.insights.matched));
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
            if ui.button("Export report…").clicked() {
                match export_report(state) {
                    Ok(Some(path)) => {
                        log::info!("Exported report to {}", path.display());
                        state.status_message = None;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Failed to export report: {e:#}");
                        state.status_message = Some(format!("Error: {e:#}"));
                    }
                }
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Insights, "📈 Insights");
        ui.selectable_value(&mut state.tab, Tab::Recommendation, "💰 Price Recommendation");

        ui.separator();

        ui.label(format!(
            "{} listings loaded from {}",
            state.dataset.len(),
            state.source.display()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset, path),
            Err(e) => {
                // The current dataset stays in place.
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Write both current reports as JSON. `Ok(None)` when the dialog was cancelled.
fn export_report(state: &AppState) -> Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export report")
        .set_file_name("report.json")
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return Ok(None);
    };

    let export = DashboardExport {
        source: state.source.display().to_string(),
        insights: Some(&state.insights),
        recommendation: Some(&state.recommendation),
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &export)
        .context("writing report JSON")?;
    Ok(Some(path))
}
