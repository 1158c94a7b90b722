use std::time::Duration;

use client_core::SearchSnapshot;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::PlaceId,
    protocol::{Review, VibeSummary},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::{results_list, search_input::SearchInput};

#[derive(Debug, Clone, PartialEq)]
pub enum VibePanel {
    Hidden,
    Loading(PlaceId),
    Loaded(VibeSummary),
    Missing(PlaceId),
    Failed { place_id: PlaceId, reason: String },
}

impl VibePanel {
    fn place_id(&self) -> Option<PlaceId> {
        match self {
            VibePanel::Hidden => None,
            VibePanel::Loading(place_id) | VibePanel::Missing(place_id) => Some(*place_id),
            VibePanel::Loaded(vibe) => Some(vibe.place_id),
            VibePanel::Failed { place_id, .. } => Some(*place_id),
        }
    }
}

/// Reviews for the place shown in the vibe panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewsPanel {
    Pending,
    Loaded(Vec<Review>),
    Failed(String),
}

pub struct SearchApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    search_input: SearchInput,
    snapshot: SearchSnapshot,
    vibe: VibePanel,
    reviews: ReviewsPanel,
    status: String,
    banner: Option<UiError>,
}

impl SearchApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            search_input: SearchInput::default(),
            snapshot: SearchSnapshot::default(),
            vibe: VibePanel::Hidden,
            reviews: ReviewsPanel::Pending,
            status: "Starting...".to_string(),
            banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::SearchStateChanged(snapshot) => {
                if snapshot.loading() {
                    self.vibe = VibePanel::Hidden;
                    self.reviews = ReviewsPanel::Pending;
                }
                self.snapshot = snapshot;
            }
            UiEvent::VibeLoaded(vibe) => {
                if self.vibe.place_id() == Some(vibe.place_id) {
                    self.vibe = VibePanel::Loaded(vibe);
                }
            }
            UiEvent::VibeMissing { place_id } => {
                if self.vibe.place_id() == Some(place_id) {
                    self.vibe = VibePanel::Missing(place_id);
                }
            }
            UiEvent::VibeFailed { place_id, reason } => {
                if self.vibe.place_id() == Some(place_id) {
                    self.vibe = VibePanel::Failed { place_id, reason };
                }
            }
            UiEvent::ReviewsLoaded { place_id, reviews } => {
                if self.vibe.place_id() == Some(place_id) {
                    self.reviews = ReviewsPanel::Loaded(reviews);
                }
            }
            UiEvent::ReviewsFailed { place_id, reason } => {
                if self.vibe.place_id() == Some(place_id) {
                    self.reviews = ReviewsPanel::Failed(reason);
                }
            }
            UiEvent::Error(err) => {
                tracing::warn!(context = ?err.context(), "{}", err.message());
                self.status = err.message().to_string();
                self.banner = Some(err);
            }
        }
    }

    fn submit(&mut self, request: shared::protocol::SearchRequest) {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::Search(request), &mut self.status);
    }

    fn select_place(&mut self, place_id: PlaceId) {
        let failed = matches!(self.vibe, VibePanel::Failed { .. })
            || matches!(self.reviews, ReviewsPanel::Failed(_));
        if self.vibe.place_id() == Some(place_id) && !failed {
            return;
        }
        self.vibe = VibePanel::Loading(place_id);
        self.reviews = ReviewsPanel::Pending;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchVibe { place_id },
            &mut self.status,
        );
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchReviews { place_id },
            &mut self.status,
        );
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        let Some(err) = &self.banner else {
            return;
        };
        let mut dismissed = false;
        egui::Frame::new()
            .fill(ui.visuals().error_fg_color.gamma_multiply(0.2))
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(err.label()).strong());
                    ui.label(err.message());
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.banner = None;
        }
    }

    fn show_vibe_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Vibe");
        ui.separator();
        match &self.vibe {
            VibePanel::Hidden => {}
            VibePanel::Loading(_) => {
                ui.spinner();
            }
            VibePanel::Loaded(vibe) => {
                ui.label(egui::RichText::new(&vibe.summary).size(15.0));
                if !vibe.mood_tags.is_empty() {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new("Mood").strong());
                    ui.horizontal_wrapped(|ui| {
                        for tag in &vibe.mood_tags {
                            ui.label(egui::RichText::new(tag).monospace());
                        }
                    });
                }
                if !vibe.key_themes.is_empty() {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new("Themes").strong());
                    for theme in &vibe.key_themes {
                        ui.label(format!("• {theme}"));
                    }
                }
            }
            VibePanel::Missing(_) => {
                ui.label(egui::RichText::new("No vibe summary yet").weak());
            }
            VibePanel::Failed { reason, .. } => {
                ui.colored_label(ui.visuals().error_fg_color, reason);
            }
        }

        ui.add_space(10.0);
        ui.heading("Reviews");
        ui.separator();
        match &self.reviews {
            ReviewsPanel::Pending => {
                ui.spinner();
            }
            ReviewsPanel::Loaded(reviews) if reviews.is_empty() => {
                ui.label(egui::RichText::new("No reviews yet").weak());
            }
            ReviewsPanel::Loaded(reviews) => {
                egui::ScrollArea::vertical()
                    .id_salt("reviews_scroll")
                    .show(ui, |ui| {
                        for review in reviews {
                            let mut header = review.source.clone();
                            if let Some(rating) = review.rating {
                                header.push_str(&format!(" · {rating:.1}/5"));
                            }
                            ui.label(egui::RichText::new(header).small().strong());
                            ui.label(&review.content);
                            ui.add_space(4.0);
                        }
                    });
            }
            ReviewsPanel::Failed(reason) => {
                ui.colored_label(ui.visuals().error_fg_color, reason);
            }
        }
    }
}

impl eframe::App for SearchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Vibe Navigator");
            self.show_banner(ui);
            if let Some(request) = self.search_input.show(ui, self.snapshot.loading()) {
                self.submit(request);
            }
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status_strip").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        if self.vibe != VibePanel::Hidden {
            egui::SidePanel::right("vibe_panel")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| self.show_vibe_panel(ui));
        }

        let view = results_list::results_view(&self.snapshot);
        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| results_list::show(ui, &view, self.vibe.place_id()))
            .inner;
        if let Some(place_id) = clicked {
            self.select_place(place_id);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
