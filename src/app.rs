use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, recommend};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RentalInsightsApp {
    pub state: AppState,
}

impl RentalInsightsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RentalInsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: insights filters ----
        if self.state.tab == Tab::Insights {
            egui::SidePanel::left("filter_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Insights => plot::insights_tab(ui, &self.state),
            Tab::Recommendation => recommend::recommendation_tab(ui, &mut self.state),
        });
    }
}
