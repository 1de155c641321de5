//! Loading-state toolkit for egui applications: a full-page overlay for view
//! transitions, an ambient mini spinner driven by tracked requests, a top
//! progress bar, per-section overlays, button loading states, skeleton
//! placeholders, and a flash-message queue.
//!
//! The core ([`Loader`] and friends) is pure state plus `Instant` deadlines,
//! advanced by `tick(now)` once per frame; the [`ui`] module renders that
//! state with egui.

pub mod button;
pub mod config;
pub mod egui_integration;
pub mod link;
pub mod loader;
pub mod progress;
pub mod skeleton;
pub mod toast;
pub mod tracker;
pub mod ui;
pub mod worker;

pub use button::{set_button_loading, ButtonState};
pub use config::{Config, Theme};
pub use link::{Link, LinkContext};
pub use loader::{FormState, Loader};
pub use progress::ProgressBar;
pub use skeleton::{
    create_skeleton, replace_skeleton, Skeleton, SkeletonKind, SkeletonOptions, SkeletonSlot,
    SkeletonWidth,
};
pub use toast::{Toast, ToastLevel, ToastQueue};
pub use tracker::{RequestGuard, RequestTracker};
pub use worker::{FetchResult, RequestWorker};
