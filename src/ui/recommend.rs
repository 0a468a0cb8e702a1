use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;
use crate::ui::panels::category_combo;

// ---------------------------------------------------------------------------
// Price recommendation tab (central panel)
// ---------------------------------------------------------------------------

pub fn recommendation_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("💵 Price Recommendation");
    ui.add_space(6.0);

    let request = &mut state.recommendation_request;
    let max_reviews = state
        .dataset
        .review_count_bounds()
        .map_or(0, |(_, max)| max);

    ui.horizontal(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.set_width(240.0);
            category_combo(
                ui,
                "sim_neighbourhood_group",
                "🏡 Neighbourhood group",
                &mut request.neighbourhood_group,
                state.dataset.neighbourhood_groups(),
            );
        });
        ui.vertical(|ui: &mut Ui| {
            ui.set_width(240.0);
            category_combo(
                ui,
                "sim_room_type",
                "🛏 Room type",
                &mut request.room_type,
                state.dataset.room_types(),
            );
        });
    });

    ui.add_space(6.0);
    ui.strong("📝 Number of reviews range");
    ui.add(egui::Slider::new(&mut request.reviews_min, 0..=max_reviews).text("min"));
    ui.add(egui::Slider::new(&mut request.reviews_max, 0..=max_reviews).text("max"));

    state.refresh_recommendation();

    ui.separator();
    let report = &state.recommendation;
    let message = report.message();
    match report.outcome.range() {
        Some(_) => {
            ui.label(RichText::new(format!("💡 {message}")).strong().size(16.0));
            ui.label(format!("Based on {} matching listings.", report.matched));
        }
        None => {
            ui.label(RichText::new(format!("❌ {message}")).color(Color32::LIGHT_RED));
        }
    }
}
