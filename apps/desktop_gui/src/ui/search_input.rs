use eframe::egui;
use shared::protocol::SearchRequest;

/// Draft search criteria. Submitting forwards them exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub query: String,
    pub city: String,
}

impl SearchInput {
    pub fn request(&self) -> SearchRequest {
        SearchRequest::new(self.query.clone(), self.city.clone())
    }

    /// Draws the form and returns a request when the user submits it.
    pub fn show(&mut self, ui: &mut egui::Ui, loading: bool) -> Option<SearchRequest> {
        let mut submitted = false;

        ui.horizontal(|ui| {
            let query = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .id_salt("search_query")
                    .hint_text("What vibe? e.g. cozy cafe")
                    .desired_width(280.0),
            );
            let city = ui.add(
                egui::TextEdit::singleline(&mut self.city)
                    .id_salt("search_city")
                    .hint_text("City")
                    .desired_width(160.0),
            );

            let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if enter_pressed && (query.lost_focus() || city.lost_focus()) {
                submitted = true;
            }

            if ui.button("Search").clicked() {
                submitted = true;
            }
            if loading {
                ui.spinner();
            }
        });

        submitted.then(|| self.request())
    }
}
