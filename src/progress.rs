//! Slim top-of-window progress bar.
//!
//! Created lazily by the [`crate::loader::Loader`] on first use and kept for
//! the lifetime of the view. Hiding fills the bar to 100% first, then
//! collapses after a short delay and resets so the next show starts clean.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Hidden,
    Indeterminate,
    Determinate(f32),
    /// Held at 100% until `remove_at`, then back to `Hidden`.
    Collapsing { remove_at: Instant },
}

#[derive(Debug, Clone)]
pub struct ProgressBar {
    phase: Phase,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            phase: Phase::Hidden,
        }
    }
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the bar. Indeterminate mode sweeps; determinate mode starts at
    /// whatever percent was last set (0 after a full hide cycle).
    pub fn show(&mut self, indeterminate: bool) {
        self.phase = match (indeterminate, self.phase) {
            (true, _) => Phase::Indeterminate,
            (false, Phase::Determinate(p)) => Phase::Determinate(p),
            (false, _) => Phase::Determinate(0.0),
        };
    }

    /// Set a determinate percent, clamped to [0, 100]. Shows the bar if it
    /// was hidden and switches out of indeterminate mode.
    pub fn update(&mut self, percent: f32) {
        self.phase = Phase::Determinate(percent.clamp(0.0, 100.0));
    }

    /// Animate to 100% and collapse after `collapse` has elapsed.
    pub fn hide(&mut self, now: Instant, collapse: Duration) {
        match self.phase {
            Phase::Hidden | Phase::Collapsing { .. } => {}
            Phase::Indeterminate | Phase::Determinate(_) => {
                self.phase = Phase::Collapsing {
                    remove_at: now + collapse,
                };
            }
        }
    }

    /// Resolve the collapse deadline.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::Collapsing { remove_at } = self.phase {
            if now >= remove_at {
                self.phase = Phase::Hidden;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub fn is_indeterminate(&self) -> bool {
        self.phase == Phase::Indeterminate
    }

    /// Current fill percent, if the bar is visible.
    /// Indeterminate mode has no meaningful percent.
    pub fn percent(&self) -> Option<f32> {
        match self.phase {
            Phase::Hidden | Phase::Indeterminate => None,
            Phase::Determinate(p) => Some(p),
            Phase::Collapsing { .. } => Some(100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLAPSE: Duration = Duration::from_millis(300);

    #[test]
    fn test_update_clamps() {
        let mut bar = ProgressBar::new();
        bar.update(150.0);
        assert_eq!(bar.percent(), Some(100.0));
        bar.update(-20.0);
        assert_eq!(bar.percent(), Some(0.0));
        bar.update(62.5);
        assert_eq!(bar.percent(), Some(62.5));
    }

    #[test]
    fn test_update_leaves_indeterminate_mode() {
        let mut bar = ProgressBar::new();
        bar.show(true);
        assert!(bar.is_indeterminate());
        bar.update(40.0);
        assert!(!bar.is_indeterminate());
        assert_eq!(bar.percent(), Some(40.0));
    }

    #[test]
    fn test_hide_fills_then_collapses_then_resets() {
        let t0 = Instant::now();
        let mut bar = ProgressBar::new();
        bar.update(70.0);

        bar.hide(t0, COLLAPSE);
        assert!(bar.is_visible());
        assert_eq!(bar.percent(), Some(100.0));

        bar.tick(t0 + Duration::from_millis(100));
        assert!(bar.is_visible());

        bar.tick(t0 + COLLAPSE);
        assert!(!bar.is_visible());

        // Next show starts clean at 0, not at the old 70.
        bar.show(false);
        assert_eq!(bar.percent(), Some(0.0));
    }

    #[test]
    fn test_hide_when_hidden_is_noop() {
        let t0 = Instant::now();
        let mut bar = ProgressBar::new();
        bar.hide(t0, COLLAPSE);
        assert!(!bar.is_visible());
        bar.tick(t0 + COLLAPSE);
        assert!(!bar.is_visible());
    }

    #[test]
    fn test_repeated_hide_keeps_first_deadline() {
        let t0 = Instant::now();
        let mut bar = ProgressBar::new();
        bar.show(true);
        bar.hide(t0, COLLAPSE);
        bar.hide(t0 + Duration::from_millis(200), COLLAPSE);
        bar.tick(t0 + COLLAPSE);
        assert!(!bar.is_visible());
    }
}
