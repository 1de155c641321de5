/// Scoped overlay covering one section's rect while that section reloads.
/// Call after the section's content so the overlay paints on top.
pub fn show_section_overlay(ui: &mut egui::Ui, rect: egui::Rect, active: bool) {
    if !active {
        return;
    }

    let painter = ui.painter();
    painter.rect_filled(
        rect,
        4.0,
        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 180),
    );

    let spinner_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(22.0, 22.0));
    egui::Spinner::new()
        .size(22.0)
        .paint_at(ui, spinner_rect);
}
