use client_core::{LifecyclePhase, SearchSnapshot};
use eframe::egui;
use shared::domain::{PlaceId, PlaceSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Idle,
    Loading,
    Error(String),
    Empty,
    Places(Vec<PlaceSummary>),
}

pub fn results_view(snapshot: &SearchSnapshot) -> ResultsView {
    match snapshot.phase() {
        LifecyclePhase::Idle => ResultsView::Idle,
        LifecyclePhase::Loading => ResultsView::Loading,
        LifecyclePhase::Failure => ResultsView::Error(snapshot.error().to_string()),
        LifecyclePhase::Success if snapshot.results().is_empty() => ResultsView::Empty,
        LifecyclePhase::Success => ResultsView::Places(
            snapshot
                .results()
                .iter()
                .map(PlaceSummary::from_record)
                .collect(),
        ),
    }
}

/// Draws the list and returns the place the user clicked, if any.
pub fn show(ui: &mut egui::Ui, view: &ResultsView, selected: Option<PlaceId>) -> Option<PlaceId> {
    match view {
        ResultsView::Idle => {
            ui.label(egui::RichText::new("Search for a vibe to get started.").weak());
            None
        }
        ResultsView::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Searching...");
            });
            None
        }
        ResultsView::Error(message) => {
            ui.colored_label(ui.visuals().error_fg_color, message);
            None
        }
        ResultsView::Empty => {
            ui.label("No places found.");
            None
        }
        ResultsView::Places(places) => {
            let mut clicked = None;
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for place in places {
                        if place_row(ui, place, selected).clicked() {
                            clicked = place.id;
                        }
                        ui.separator();
                    }
                });
            clicked
        }
    }
}

fn place_row(ui: &mut egui::Ui, place: &PlaceSummary, selected: Option<PlaceId>) -> egui::Response {
    let is_selected = place.id.is_some() && place.id == selected;
    ui.vertical(|ui| {
        let title = egui::RichText::new(place.display_name()).strong().size(16.0);
        let response = ui.add_enabled(place.id.is_some(), egui::Button::selectable(is_selected, title));
        if let Some(subtitle) = place.subtitle() {
            ui.label(subtitle);
        }
        if let Some(address) = &place.address {
            ui.small(address);
        }
        if let Some((lat, lon)) = place.coordinates() {
            ui.small(egui::RichText::new(format!("{lat:.4}, {lon:.4}")).weak());
        }
        response
    })
    .inner
}
