use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Insights tab (central panel)
// ---------------------------------------------------------------------------

pub fn insights_tab(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("📊 Insights");
            if state.insights.matched == 0 {
                ui.label(RichText::new("No listings match the current selection.").italics());
            }

            ui.strong("Room Type vs. Number of Listings");
            room_type_scatter(ui, state);
            ui.add_space(12.0);

            ui.strong(format!(
                "Top {} Apartments by Reviews per Month",
                state.insights_request.top_n
            ));
            top_reviews_chart(ui, state);
            top_reviews_table(ui, state);
            ui.add_space(12.0);

            ui.strong("Reviews vs. Price");
            reviews_price_scatter(ui, state);
            ui.add_space(12.0);

            ui.strong("💲 Price Distribution by Listing Type");
            price_box_plot(ui, state);
        });
}

/// Axis formatter that prints `labels[i]` at integer positions.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v.fract() != 0.0 || v < 0.0 {
            return String::new();
        }
        labels.get(v as usize).cloned().unwrap_or_default()
    }
}

fn room_type_scatter(ui: &mut Ui, state: &AppState) {
    let rooms: Vec<String> = state.dataset.room_types().to_vec();

    Plot::new("room_type_vs_listings")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("room_type")
        .y_axis_label("calculated_host_listings_count")
        .x_axis_formatter(category_axis(rooms.clone()))
        .show(ui, |plot_ui| {
            for (x, room) in rooms.iter().enumerate() {
                let points: Vec<[f64; 2]> = state
                    .insights
                    .room_type_vs_listings
                    .iter()
                    .filter(|p| p.room_type == *room)
                    .map(|p| [x as f64, p.calculated_host_listings_count as f64])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(room)
                        .color(state.room_colors.color_for(room))
                        .radius(3.0),
                );
            }
        });
}

fn top_reviews_chart(ui: &mut Ui, state: &AppState) {
    let top = &state.insights.top_by_reviews_per_month;
    let names: Vec<String> = top.iter().map(|r| r.name.clone()).collect();

    // One chart per neighbourhood so the legend names them.
    let mut neighbourhoods: Vec<&str> = Vec::new();
    for rate in top {
        if !neighbourhoods.contains(&rate.neighbourhood.as_str()) {
            neighbourhoods.push(&rate.neighbourhood);
        }
    }

    Plot::new("top_reviews_per_month")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("name")
        .y_axis_label("reviews_per_month")
        .x_axis_formatter(category_axis(names))
        .show(ui, |plot_ui| {
            for neighbourhood in neighbourhoods {
                let color = state.neighbourhood_colors.color_for(neighbourhood);
                let bars: Vec<Bar> = top
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.neighbourhood == neighbourhood)
                    .map(|(i, r)| {
                        Bar::new(i as f64, r.reviews_per_month.unwrap_or(0.0))
                            .name(&r.name)
                            .width(0.7)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(neighbourhood).color(color));
            }
        });
}

fn top_reviews_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder())
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(120.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("name");
            });
            header.col(|ui| {
                ui.strong("neighbourhood");
            });
            header.col(|ui| {
                ui.strong("reviews_per_month");
            });
        })
        .body(|mut body| {
            for rate in &state.insights.top_by_reviews_per_month {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(rate.name.as_str());
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(&rate.neighbourhood)
                                .color(state.neighbourhood_colors.color_for(&rate.neighbourhood)),
                        );
                    });
                    row.col(|ui| {
                        ui.label(
                            rate.reviews_per_month
                                .map(|r| format!("{r:.2}"))
                                .unwrap_or_else(|| "–".to_string()),
                        );
                    });
                });
            }
        });
}

fn reviews_price_scatter(ui: &mut Ui, state: &AppState) {
    let points: Vec<[f64; 2]> = state
        .insights
        .reviews_vs_price
        .iter()
        .map(|p| [p.number_of_reviews as f64, p.price])
        .collect();

    Plot::new("reviews_vs_price")
        .height(CHART_HEIGHT)
        .x_axis_label("number_of_reviews")
        .y_axis_label("price")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(Color32::LIGHT_BLUE)
                    .radius(2.5),
            );
        });
}

fn price_box_plot(ui: &mut Ui, state: &AppState) {
    let groups = &state.insights.price_distribution;
    let rooms: Vec<String> = groups.iter().map(|g| g.room_type.clone()).collect();

    Plot::new("price_by_room_type")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("room_type")
        .y_axis_label("price")
        .x_axis_formatter(category_axis(rooms))
        .show(ui, |plot_ui| {
            for (x, group) in groups.iter().enumerate() {
                let color = state.room_colors.color_for(&group.room_type);
                let s = group.summary;
                let spread = BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max);
                let elem = BoxElem::new(x as f64, spread)
                    .name(&group.room_type)
                    .box_width(0.5)
                    .fill(color.linear_multiply(0.25))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.room_type));
            }
        });
}
