//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, SearchController, SearchEvent};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || run_backend(settings, cmd_rx, ui_tx));
}

fn run_backend(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: failed to build runtime: {err}"),
            )));
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    runtime.block_on(async move {
        let controller = match SearchController::from_settings(&settings) {
            Ok(controller) => controller,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("{err:#}"),
                )));
                tracing::error!("failed to build search controller: {err:#}");
                return;
            }
        };

        // Subscribed before any command is served so the first Loading is never missed.
        let events = controller.subscribe();
        tokio::spawn(forward_search_events(
            Arc::clone(&controller),
            events,
            ui_tx.clone(),
        ));
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Connected to {}",
            settings.search_base_url.trim()
        )));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::Search(request) => {
                    // Not awaited: a newer search may be submitted while this one runs.
                    let _task = controller.handle_search(request);
                }
                BackendCommand::FetchVibe { place_id } => {
                    let controller = Arc::clone(&controller);
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let event = match controller.fetch_vibe_summary(place_id).await {
                            Ok(vibe) => UiEvent::VibeLoaded(vibe),
                            Err(err) if err.is_not_found() => UiEvent::VibeMissing { place_id },
                            Err(err) => UiEvent::VibeFailed {
                                place_id,
                                reason: err.user_message().to_string(),
                            },
                        };
                        let _ = ui_tx.try_send(event);
                    });
                }
                BackendCommand::FetchReviews { place_id } => {
                    let controller = Arc::clone(&controller);
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let event = match controller.fetch_reviews(place_id).await {
                            Ok(reviews) => UiEvent::ReviewsLoaded { place_id, reviews },
                            Err(err) => UiEvent::ReviewsFailed {
                                place_id,
                                reason: err.user_message().to_string(),
                            },
                        };
                        let _ = ui_tx.try_send(event);
                    });
                }
            }
        }
        tracing::info!("ui command queue closed; backend worker exiting");
    });
}

async fn forward_search_events(
    controller: Arc<SearchController>,
    mut events: broadcast::Receiver<SearchEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let snapshot = match events.recv().await {
            Ok(SearchEvent::StateChanged(snapshot)) => snapshot,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "search events lagged; resending current state");
                controller.snapshot()
            }
            Err(RecvError::Closed) => break,
        };
        if ui_tx.send(UiEvent::SearchStateChanged(snapshot)).is_err() {
            break;
        }
    }
}
