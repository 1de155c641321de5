/// Full-viewport overlay shown during view transitions. `opacity` comes from
/// the loader's fade phase; the overlay keeps blocking input until it leaves
/// layout entirely.
pub fn show_page_loader(ctx: &egui::Context, opacity: f32) {
    egui::Area::new(egui::Id::from("page_loader"))
        .fixed_pos(egui::pos2(0.0, 0.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let screen = ui.ctx().screen_rect();
            // Swallow pointer input so nothing underneath is clickable.
            ui.interact(
                screen,
                ui.id().with("blocker"),
                egui::Sense::click_and_drag(),
            );
            let painter = ui.painter();

            let alpha = (230.0 * opacity) as u8;
            painter.rect_filled(
                screen,
                0.0,
                egui::Color32::from_rgba_unmultiplied(18, 18, 24, alpha),
            );

            // Center spinner + text
            ui.allocate_new_ui(egui::UiBuilder::new().max_rect(screen), |ui| {
                ui.vertical_centered(|ui| {
                    let center_y = screen.height() / 2.0 - 20.0;
                    ui.add_space(center_y);
                    ui.add(egui::Spinner::new().size(32.0));
                    ui.label(
                        egui::RichText::new("Loading\u{2026}")
                            .color(egui::Color32::from_white_alpha((255.0 * opacity) as u8)),
                    );
                });
            });
        });
}
