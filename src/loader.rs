//! The loading-state core: one `Loader` per page view, owning the page
//! overlay, the ambient mini spinner, per-section overlays, and the progress
//! bar. All timing is deadline-based and driven by `tick(now)`, so the whole
//! machine runs without a window or a real clock.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::button::{set_button_loading, ButtonState};
use crate::config::Config;
use crate::link::{should_show_loader, Link, LinkContext};
use crate::progress::ProgressBar;
use crate::tracker::RequestTracker;

/// Page overlay lifecycle. `Fading` still occupies layout; `Hidden` does not.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PagePhase {
    Visible,
    Fading { remove_at: Instant },
    Hidden,
}

/// A form as the loading layer sees it: a submit button plus the opt-out
/// flag for forms that handle their own submission asynchronously.
#[derive(Debug, Clone)]
pub struct FormState {
    pub submit: ButtonState,
    pub async_submit: bool,
}

impl FormState {
    pub fn new(submit_label: impl Into<String>) -> Self {
        Self {
            submit: ButtonState::new(submit_label),
            async_submit: false,
        }
    }

    pub fn async_submit(mut self) -> Self {
        self.async_submit = true;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Timings {
    page_hide_delay: Duration,
    page_fade: Duration,
    page_fallback: Duration,
    progress_collapse: Duration,
}

impl Timings {
    fn from_config(config: &Config) -> Self {
        Self {
            page_hide_delay: Duration::from_millis(config.page_hide_delay_ms),
            page_fade: Duration::from_millis(config.page_fade_ms),
            page_fallback: Duration::from_millis(config.page_fallback_ms),
            progress_collapse: Duration::from_millis(config.progress_collapse_ms),
        }
    }
}

/// Loading state for one page view.
///
/// Construct one per navigation; the page overlay starts visible and is
/// hidden by the document-loaded signal or, failing that, by the fallback
/// deadline. Share the [`RequestTracker`] across views so in-flight work
/// survives a navigation.
pub struct Loader {
    timings: Timings,
    page: PagePhase,
    /// Armed by `on_document_loaded`; hides the page overlay when it expires.
    pending_hide: Option<Instant>,
    /// Armed once at construction and never cancelled. When the load path
    /// wins the race this fires into an idempotent no-op hide.
    fallback_at: Option<Instant>,
    mini_visible: bool,
    prev_active: usize,
    tracker: RequestTracker,
    /// Section containers the adapter has declared to exist.
    known_sections: HashSet<String>,
    /// Lazily created per-section overlay visibility.
    sections: HashMap<String, bool>,
    progress: ProgressBar,
}

impl Loader {
    /// Fresh view with its own tracker.
    pub fn new(config: &Config, now: Instant) -> Self {
        Self::with_tracker(config, RequestTracker::new(), now)
    }

    /// Fresh view sharing an existing tracker (in-flight requests keep the
    /// mini loader alive across the navigation).
    pub fn with_tracker(config: &Config, tracker: RequestTracker, now: Instant) -> Self {
        let timings = Timings::from_config(config);
        Self {
            timings,
            page: PagePhase::Visible,
            pending_hide: None,
            fallback_at: Some(now + timings.page_fallback),
            mini_visible: false,
            prev_active: 0,
            tracker,
            known_sections: HashSet::new(),
            sections: HashMap::new(),
            progress: ProgressBar::new(),
        }
    }

    // ----- page overlay -----

    /// Show the full-page overlay. Idempotent.
    pub fn show_page(&mut self) {
        if self.page != PagePhase::Visible {
            self.page = PagePhase::Visible;
        }
    }

    /// Start hiding the full-page overlay: fade now, leave layout once the
    /// fade completes. Idempotent; repeated calls never re-arm the removal.
    pub fn hide_page(&mut self, now: Instant) {
        if self.page == PagePhase::Visible {
            self.page = PagePhase::Fading {
                remove_at: now + self.timings.page_fade,
            };
        }
    }

    /// The document-loaded signal. Hides the overlay after a small delay for
    /// perceived smoothness.
    pub fn on_document_loaded(&mut self, now: Instant) {
        self.pending_hide = Some(now + self.timings.page_hide_delay);
    }

    /// Back/forward restore of an already rendered view: the overlay must
    /// never linger over it.
    pub fn on_page_restored(&mut self, now: Instant) {
        self.hide_page(now);
    }

    /// A click on a link. Shows the page overlay only for same-host
    /// navigations to a different path or query; returns whether it did.
    pub fn on_link_click(&mut self, ctx: &LinkContext, link: &Link) -> bool {
        if should_show_loader(ctx, link) {
            log::info!("Navigating to {}", link.href);
            self.show_page();
            true
        } else {
            false
        }
    }

    /// A form submission. Async-flagged forms manage their own loading state;
    /// everything else gets a disabled spinner button and the mini loader.
    pub fn on_form_submit(&mut self, form: &mut FormState) {
        if form.async_submit {
            return;
        }
        set_button_loading(Some(&mut form.submit), true);
        self.show_mini();
    }

    /// True while the overlay occupies layout (visible or fading).
    pub fn page_in_layout(&self) -> bool {
        self.page != PagePhase::Hidden
    }

    /// Overlay opacity: 1 while visible, ramping to 0 through the fade.
    pub fn page_opacity(&self, now: Instant) -> f32 {
        match self.page {
            PagePhase::Visible => 1.0,
            PagePhase::Hidden => 0.0,
            PagePhase::Fading { remove_at } => {
                if self.timings.page_fade.is_zero() || now >= remove_at {
                    return 0.0;
                }
                let remaining = remove_at.saturating_duration_since(now);
                (remaining.as_secs_f32() / self.timings.page_fade.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    // ----- mini loader -----

    pub fn show_mini(&mut self) {
        self.mini_visible = true;
    }

    pub fn hide_mini(&mut self) {
        self.mini_visible = false;
    }

    pub fn mini_visible(&self) -> bool {
        self.mini_visible
    }

    /// The shared tracker; clone it into workers and decorated calls.
    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    // ----- section overlays -----

    /// Declare that a section container exists. Show/hide for undeclared
    /// sections are silent no-ops.
    pub fn register_section(&mut self, id: impl Into<String>) {
        self.known_sections.insert(id.into());
    }

    /// Show a scoped overlay inside the named section. The overlay state is
    /// created lazily on first use.
    pub fn show_section(&mut self, id: &str) {
        if !self.known_sections.contains(id) {
            return;
        }
        self.sections.insert(id.to_string(), true);
    }

    pub fn hide_section(&mut self, id: &str) {
        if let Some(active) = self.sections.get_mut(id) {
            *active = false;
        }
    }

    pub fn section_active(&self, id: &str) -> bool {
        self.sections.get(id).copied().unwrap_or(false)
    }

    // ----- progress bar -----

    pub fn show_progress(&mut self, indeterminate: bool) {
        self.progress.show(indeterminate);
    }

    pub fn update_progress(&mut self, percent: f32) {
        self.progress.update(percent);
    }

    pub fn hide_progress(&mut self, now: Instant) {
        self.progress.hide(now, self.timings.progress_collapse);
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    // ----- frame tick -----

    /// Resolve expired deadlines and sync the mini loader with the tracker.
    /// The load-complete and fallback hide paths race here; hide is
    /// idempotent so the loser is a no-op.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.pending_hide {
            if now >= at {
                self.pending_hide = None;
                self.hide_page(now);
            }
        }
        if let Some(at) = self.fallback_at {
            if now >= at {
                self.fallback_at = None;
                if self.page == PagePhase::Visible {
                    log::warn!("Page load signal never fired; force-hiding the page overlay");
                }
                self.hide_page(now);
            }
        }
        if let PagePhase::Fading { remove_at } = self.page {
            if now >= remove_at {
                self.page = PagePhase::Hidden;
            }
        }

        // Every new request re-shows the spinner, so a manual hide_mini only
        // holds until the next request starts.
        let active = self.tracker.active();
        if active > self.prev_active {
            self.show_mini();
        } else if active == 0 && self.prev_active > 0 {
            self.hide_mini();
        }
        self.prev_active = active;

        self.progress.tick(now);
    }

    /// True while anything is busy; the shell uses this to keep repainting.
    pub fn is_busy(&self) -> bool {
        self.page_in_layout()
            || self.mini_visible
            || !self.tracker.is_idle()
            || self.progress.is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(t0: Instant) -> Loader {
        Loader::new(&Config::default(), t0)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_document_loaded_hides_after_delay() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        assert!(l.page_in_layout());

        l.on_document_loaded(t0);
        l.tick(t0 + ms(299));
        assert_eq!(l.page_opacity(t0 + ms(299)), 1.0);

        l.tick(t0 + ms(300));
        assert!(l.page_in_layout());
        assert!(l.page_opacity(t0 + ms(500)) < 1.0);

        // Out of layout once the 400ms fade completes.
        l.tick(t0 + ms(700));
        assert!(!l.page_in_layout());
    }

    #[test]
    fn test_hide_show_hide_is_idempotent() {
        let t0 = Instant::now();
        let mut l = loader(t0);

        l.hide_page(t0);
        l.hide_page(t0 + ms(100)); // must not re-arm the removal deadline
        l.tick(t0 + ms(400));
        assert!(!l.page_in_layout());

        l.show_page();
        assert!(l.page_in_layout());
        l.hide_page(t0 + ms(500));
        l.tick(t0 + ms(900));
        assert!(!l.page_in_layout());

        l.hide_page(t0 + ms(1000));
        l.tick(t0 + ms(1500));
        assert!(!l.page_in_layout());
    }

    #[test]
    fn test_fallback_force_hides_before_late_load() {
        let t0 = Instant::now();
        let mut l = loader(t0);

        // Nothing fires the load signal; the 5s fallback wins.
        l.tick(t0 + ms(4999));
        assert!(l.page_in_layout());
        l.tick(t0 + ms(5000));
        l.tick(t0 + ms(5400));
        assert!(!l.page_in_layout());

        // Load completes at 6s; its delayed hide is a harmless no-op.
        l.on_document_loaded(t0 + ms(6000));
        l.tick(t0 + ms(6300));
        l.tick(t0 + ms(6800));
        assert!(!l.page_in_layout());
    }

    #[test]
    fn test_fallback_fires_once_not_forever() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        l.tick(t0 + ms(5000));
        l.tick(t0 + ms(5400));
        assert!(!l.page_in_layout());

        // A later explicit show must not be clobbered by a stale fallback.
        l.show_page();
        l.tick(t0 + ms(9000));
        assert!(l.page_in_layout());
    }

    #[test]
    fn test_restored_view_never_keeps_overlay() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        l.on_page_restored(t0);
        l.tick(t0 + ms(400));
        assert!(!l.page_in_layout());
    }

    #[test]
    fn test_link_click_heuristic_drives_overlay() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        l.hide_page(t0);
        l.tick(t0 + ms(400));
        let ctx = LinkContext::new("farm.example.com", "/dashboard", "");

        assert!(!l.on_link_click(&ctx, &Link::new("#stats")));
        assert!(!l.page_in_layout());

        assert!(l.on_link_click(&ctx, &Link::new("/sows")));
        assert!(l.page_in_layout());
    }

    #[test]
    fn test_mini_tracks_overlapping_requests_without_flicker() {
        let t0 = Instant::now();
        let mut l = loader(t0);

        let first = l.tracker().begin();
        l.tick(t0 + ms(10));
        assert!(l.mini_visible());

        let second = l.tracker().begin();
        l.tick(t0 + ms(20));
        assert!(l.mini_visible());

        // Second settles first (the 50ms call); still one outstanding.
        drop(second);
        l.tick(t0 + ms(60));
        assert!(l.mini_visible());

        drop(first);
        l.tick(t0 + ms(110));
        assert!(!l.mini_visible());
    }

    #[test]
    fn test_mini_visible_iff_outstanding_for_mixed_outcomes() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        let tracker = l.tracker().clone();

        let ok: Result<(), &str> = tracker.track(|| Ok(()));
        let err: Result<(), &str> = tracker.track(|| Err("boom"));
        assert!(ok.is_ok());
        assert!(err.is_err());

        let guards: Vec<_> = (0..3).map(|_| tracker.begin()).collect();
        l.tick(t0 + ms(10));
        assert!(l.mini_visible());

        for g in guards {
            drop(g);
        }
        l.tick(t0 + ms(20));
        assert!(!l.mini_visible());
    }

    #[test]
    fn test_manual_mini_override_between_requests() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        l.show_mini();
        assert!(l.mini_visible());
        l.hide_mini();
        assert!(!l.mini_visible());
        l.tick(t0 + ms(10));
        assert!(!l.mini_visible());
    }

    #[test]
    fn test_new_request_reshows_mini_after_manual_hide() {
        let t0 = Instant::now();
        let mut l = loader(t0);

        let first = l.tracker().begin();
        l.tick(t0 + ms(10));
        assert!(l.mini_visible());

        // Manual hide holds while the count is steady...
        l.hide_mini();
        l.tick(t0 + ms(20));
        assert!(!l.mini_visible());

        // ...but the next request starting brings the spinner back.
        let second = l.tracker().begin();
        l.tick(t0 + ms(30));
        assert!(l.mini_visible());

        drop(first);
        drop(second);
        l.tick(t0 + ms(40));
        assert!(!l.mini_visible());
    }

    #[test]
    fn test_form_submit_disables_button_and_shows_mini() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        let mut form = FormState::new("Add litter");

        l.on_form_submit(&mut form);
        assert!(form.submit.is_loading());
        assert!(!form.submit.enabled());
        assert!(l.mini_visible());
    }

    #[test]
    fn test_async_form_opts_out() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        let mut form = FormState::new("Search").async_submit();

        l.on_form_submit(&mut form);
        assert!(!form.submit.is_loading());
        assert!(!l.mini_visible());
    }

    #[test]
    fn test_unknown_section_is_silent_noop() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        l.show_section("no-such-section");
        assert!(!l.section_active("no-such-section"));
        l.hide_section("no-such-section");
    }

    #[test]
    fn test_section_overlay_lazy_create_and_toggle() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        l.register_section("expense-table");
        assert!(!l.section_active("expense-table"));

        l.show_section("expense-table");
        assert!(l.section_active("expense-table"));
        l.hide_section("expense-table");
        assert!(!l.section_active("expense-table"));
        l.show_section("expense-table");
        assert!(l.section_active("expense-table"));
    }

    #[test]
    fn test_progress_clamps_through_loader() {
        let t0 = Instant::now();
        let mut l = loader(t0);
        l.update_progress(150.0);
        assert_eq!(l.progress().percent(), Some(100.0));
        l.update_progress(-20.0);
        assert_eq!(l.progress().percent(), Some(0.0));
    }

    #[test]
    fn test_shared_tracker_survives_navigation() {
        let t0 = Instant::now();
        let config = Config::default();
        let mut l = Loader::new(&config, t0);
        let guard = l.tracker().begin();
        l.tick(t0 + ms(10));
        assert!(l.mini_visible());

        // Navigate: fresh view, same tracker.
        let mut next = Loader::with_tracker(&config, l.tracker().clone(), t0 + ms(20));
        next.tick(t0 + ms(30));
        assert!(next.mini_visible());
        drop(guard);
        next.tick(t0 + ms(40));
        assert!(!next.mini_visible());
    }
}
