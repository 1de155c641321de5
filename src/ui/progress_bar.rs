use crate::progress::ProgressBar;

const BAR_HEIGHT: f32 = 3.0;

/// Thin progress bar along the top edge of the window. Determinate mode fills
/// left to right; indeterminate mode sweeps a segment back and forth.
pub fn show_progress_bar(ctx: &egui::Context, bar: &ProgressBar) {
    if !bar.is_visible() {
        return;
    }

    egui::Area::new(egui::Id::from("progress_loader"))
        .fixed_pos(egui::pos2(0.0, 0.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            let screen = ui.ctx().screen_rect();
            let painter = ui.painter();

            let track = egui::Rect::from_min_size(
                screen.min,
                egui::vec2(screen.width(), BAR_HEIGHT),
            );
            painter.rect_filled(track, 0.0, egui::Color32::from_black_alpha(40));

            let accent = egui::Color32::from_rgb(66, 133, 244);
            if bar.is_indeterminate() {
                // Sweep: a 30%-wide segment bouncing across the track.
                let t = ui.ctx().input(|i| i.time) as f32;
                let phase = (t * 0.8).fract();
                let sweep = if phase < 0.5 { phase * 2.0 } else { 2.0 - phase * 2.0 };
                let seg_w = screen.width() * 0.3;
                let x = sweep * (screen.width() - seg_w);
                let seg = egui::Rect::from_min_size(
                    egui::pos2(screen.min.x + x, screen.min.y),
                    egui::vec2(seg_w, BAR_HEIGHT),
                );
                painter.rect_filled(seg, 0.0, accent);
                ui.ctx().request_repaint();
            } else if let Some(percent) = bar.percent() {
                let fill = egui::Rect::from_min_size(
                    screen.min,
                    egui::vec2(screen.width() * percent / 100.0, BAR_HEIGHT),
                );
                painter.rect_filled(fill, 0.0, accent);
            }
        });
}
