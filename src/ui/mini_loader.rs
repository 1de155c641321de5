/// Small ambient spinner in the bottom-right corner, shown while tracked
/// requests are in flight.
pub fn show_mini_loader(ctx: &egui::Context) {
    egui::Area::new(egui::Id::from("mini_loader"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new().size(14.0));
                    ui.small("Working\u{2026}");
                });
            });
        });
}
