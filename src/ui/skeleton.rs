use std::time::{Duration, Instant};

use crate::skeleton::{SkeletonKind, SkeletonSlot, SkeletonWidth};

/// Draw one skeleton slot: a pulsing grey shape while it is a placeholder,
/// the loaded content fading in once it has been replaced.
pub fn show_skeleton_slot(
    ui: &mut egui::Ui,
    slot: &SkeletonSlot,
    now: Instant,
    fade: Duration,
) {
    if slot.is_detached() {
        return;
    }

    if let Some(skeleton) = slot.skeleton() {
        let size = placeholder_size(ui, skeleton.kind, skeleton.width);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());

        // Pulse between two greys on a ~1.2s cycle.
        let t = ui.ctx().input(|i| i.time) as f32;
        let pulse = 0.5 + 0.5 * (t * std::f32::consts::TAU / 1.2).sin();
        let grey = 200 + (25.0 * pulse) as u8;
        let rounding = match skeleton.kind {
            SkeletonKind::Avatar => rect.height() / 2.0,
            _ => 4.0,
        };
        ui.painter().rect_filled(
            rect,
            rounding,
            egui::Color32::from_gray(grey),
        );
        ui.ctx().request_repaint();
    } else if let Some(content) = slot.content() {
        let opacity = slot.opacity(now, fade);
        ui.label(
            egui::RichText::new(content)
                .color(ui.visuals().text_color().gamma_multiply(opacity)),
        );
        if opacity < 1.0 {
            ui.ctx().request_repaint();
        }
    }
}

fn placeholder_size(
    ui: &egui::Ui,
    kind: SkeletonKind,
    width: Option<SkeletonWidth>,
) -> egui::Vec2 {
    let available = ui.available_width();
    let text_width = match width {
        Some(SkeletonWidth::Short) => available * 0.3,
        Some(SkeletonWidth::Medium) => available * 0.6,
        Some(SkeletonWidth::Long) | None => available * 0.9,
    };
    match kind {
        SkeletonKind::Text => egui::vec2(text_width, 14.0),
        SkeletonKind::Title => egui::vec2(text_width, 22.0),
        SkeletonKind::Avatar => egui::vec2(40.0, 40.0),
        SkeletonKind::Thumbnail => egui::vec2(80.0, 60.0),
        SkeletonKind::Card => egui::vec2(available * 0.9, 90.0),
    }
}
