pub mod button;
pub mod mini_loader;
pub mod page_loader;
pub mod progress_bar;
pub mod section;
pub mod skeleton;
pub mod toast;

use std::time::Instant;

use crate::config::Config;
use crate::loader::Loader;
use crate::toast::ToastQueue;

#[derive(Debug, Clone)]
pub enum UiAction {
    DismissToast(u64),
    None,
}

/// Draw the whole loading layer on top of the application's own panels:
/// progress bar, mini spinner, toast stack, and the page overlay last so it
/// covers everything. Returns actions for the shell to process.
pub fn draw_loading_layer(
    ctx: &egui::Context,
    loader: &Loader,
    toasts: &ToastQueue,
    config: &Config,
    now: Instant,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    progress_bar::show_progress_bar(ctx, loader.progress());

    if loader.mini_visible() {
        mini_loader::show_mini_loader(ctx);
    }

    actions.extend(toast::show_toast_stack(ctx, toasts, config, now));

    if loader.page_in_layout() {
        page_loader::show_page_loader(ctx, loader.page_opacity(now));
    }

    actions
}
