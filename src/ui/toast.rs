use std::time::{Duration, Instant};

use crate::config::Config;
use crate::toast::{ToastLevel, ToastQueue};
use crate::ui::UiAction;

/// Flash messages stacked under the top-right corner, newest last. The close
/// button requests a dismissal; removal itself stays with the queue's tick.
pub fn show_toast_stack(
    ctx: &egui::Context,
    toasts: &ToastQueue,
    config: &Config,
    now: Instant,
) -> Vec<UiAction> {
    let mut actions = Vec::new();
    if toasts.is_empty() {
        return actions;
    }

    let fade = Duration::from_millis(config.toast_fade_ms);

    egui::Area::new(egui::Id::from("toast_stack"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 40.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for toast in toasts.iter() {
                let opacity = toast.opacity(now, fade);
                let accent = level_colour(toast.level).gamma_multiply(opacity);

                egui::Frame::popup(ui.style())
                    .fill(ui.visuals().window_fill().gamma_multiply(opacity))
                    .stroke(egui::Stroke::new(1.5, accent))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(accent, &toast.message);
                            if !toast.is_dismissing()
                                && ui
                                    .add(
                                        egui::Button::new(
                                            egui::RichText::new("\u{2715}").size(10.0),
                                        )
                                        .frame(false),
                                    )
                                    .clicked()
                            {
                                actions.push(UiAction::DismissToast(toast.id));
                            }
                        });
                    });
                ui.add_space(4.0);

                if toast.is_dismissing() {
                    ui.ctx().request_repaint();
                }
            }
        });

    actions
}

fn level_colour(level: ToastLevel) -> egui::Color32 {
    match level {
        ToastLevel::Success => egui::Color32::from_rgb(52, 168, 83),
        ToastLevel::Error => egui::Color32::from_rgb(217, 48, 37),
        ToastLevel::Warning => egui::Color32::from_rgb(249, 171, 0),
        ToastLevel::Info => egui::Color32::from_rgb(66, 133, 244),
    }
}
