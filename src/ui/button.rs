use crate::button::ButtonState;

/// A button that renders a spinner and refuses clicks while its state is
/// loading, and its stashed label otherwise.
pub fn loading_button(ui: &mut egui::Ui, state: &ButtonState) -> egui::Response {
    if state.is_loading() {
        ui.add_enabled_ui(false, |ui| {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new().size(12.0));
                ui.button("Working\u{2026}")
            })
            .inner
        })
        .inner
    } else {
        ui.button(state.label())
    }
}
