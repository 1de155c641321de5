//! Skeleton placeholders: grey shapes shown while real content loads, later
//! swapped for that content with a short fade-in.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonKind {
    Text,
    Title,
    Avatar,
    Thumbnail,
    Card,
}

/// Width modifier for text-like skeletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonWidth {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Default)]
pub struct SkeletonOptions {
    pub width: Option<SkeletonWidth>,
    pub class: Option<String>,
}

/// A placeholder element tagged by kind, width, and optional extra class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    pub kind: SkeletonKind,
    pub width: Option<SkeletonWidth>,
    pub class: Option<String>,
}

/// Build a placeholder of the given kind. Width only applies to text kinds.
pub fn create_skeleton(kind: SkeletonKind, options: SkeletonOptions) -> Skeleton {
    let width = match kind {
        SkeletonKind::Text | SkeletonKind::Title => options.width,
        _ => None,
    };
    Skeleton {
        kind,
        width,
        class: options.class,
    }
}

impl Skeleton {
    /// Class list the adapter styles by, mirroring `skeleton skeleton-<kind>`.
    pub fn classes(&self) -> Vec<String> {
        let kind = match self.kind {
            SkeletonKind::Text => "text",
            SkeletonKind::Title => "title",
            SkeletonKind::Avatar => "avatar",
            SkeletonKind::Thumbnail => "thumbnail",
            SkeletonKind::Card => "card",
        };
        let mut classes = vec!["skeleton".to_string(), format!("skeleton-{kind}")];
        if let Some(width) = self.width {
            classes.push(
                match width {
                    SkeletonWidth::Short => "short",
                    SkeletonWidth::Medium => "medium",
                    SkeletonWidth::Long => "long",
                }
                .to_string(),
            );
        }
        if let Some(class) = &self.class {
            classes.push(class.clone());
        }
        classes
    }
}

/// Swap a placeholder for real content. A missing slot is a silent no-op,
/// as is a slot that has already been detached or loaded.
pub fn replace_skeleton(slot: Option<&mut SkeletonSlot>, content: impl Into<String>, now: Instant) {
    if let Some(slot) = slot {
        slot.replace(content, now);
    }
}

#[derive(Debug, Clone)]
enum SlotState {
    Placeholder(Skeleton),
    Loaded { content: String, since: Instant },
    Detached,
}

/// One position in the view that shows a skeleton until content arrives.
#[derive(Debug, Clone)]
pub struct SkeletonSlot {
    state: SlotState,
}

impl SkeletonSlot {
    pub fn new(skeleton: Skeleton) -> Self {
        Self {
            state: SlotState::Placeholder(skeleton),
        }
    }

    /// Swap the placeholder for real content, starting the fade-in at `now`.
    /// No-op if the slot no longer holds a placeholder.
    pub fn replace(&mut self, content: impl Into<String>, now: Instant) {
        if let SlotState::Placeholder(_) = self.state {
            self.state = SlotState::Loaded {
                content: content.into(),
                since: now,
            };
        }
    }

    /// Remove the slot from the view entirely. Later `replace` calls no-op.
    pub fn detach(&mut self) {
        self.state = SlotState::Detached;
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.state, SlotState::Placeholder(_))
    }

    pub fn is_detached(&self) -> bool {
        matches!(self.state, SlotState::Detached)
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        match &self.state {
            SlotState::Placeholder(s) => Some(s),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.state {
            SlotState::Loaded { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Fade-in opacity of loaded content: 0 at the swap, 1 once `fade` has
    /// elapsed. Placeholders render at full opacity (they pulse instead).
    pub fn opacity(&self, now: Instant, fade: Duration) -> f32 {
        match &self.state {
            SlotState::Placeholder(_) => 1.0,
            SlotState::Detached => 0.0,
            SlotState::Loaded { since, .. } => {
                if fade.is_zero() {
                    return 1.0;
                }
                let elapsed = now.saturating_duration_since(*since);
                (elapsed.as_secs_f32() / fade.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: Duration = Duration::from_millis(300);

    #[test]
    fn test_create_tags_kind_and_width() {
        let skeleton = create_skeleton(
            SkeletonKind::Text,
            SkeletonOptions {
                width: Some(SkeletonWidth::Short),
                class: None,
            },
        );
        assert_eq!(skeleton.classes(), vec!["skeleton", "skeleton-text", "short"]);

        let card = create_skeleton(
            SkeletonKind::Card,
            SkeletonOptions {
                width: Some(SkeletonWidth::Long),
                class: Some("stat-card".to_string()),
            },
        );
        // Width modifiers are text-only.
        assert_eq!(card.classes(), vec!["skeleton", "skeleton-card", "stat-card"]);
    }

    #[test]
    fn test_replace_swaps_and_fades_in() {
        let t0 = Instant::now();
        let skeleton = create_skeleton(SkeletonKind::Text, SkeletonOptions::default());
        let mut slot = SkeletonSlot::new(skeleton);
        assert!(slot.is_placeholder());

        slot.replace("Loaded", t0);
        assert_eq!(slot.content(), Some("Loaded"));
        assert_eq!(slot.opacity(t0, FADE), 0.0);
        let mid = slot.opacity(t0 + Duration::from_millis(150), FADE);
        assert!((mid - 0.5).abs() < 1e-3);
        assert_eq!(slot.opacity(t0 + FADE, FADE), 1.0);
        assert_eq!(slot.opacity(t0 + Duration::from_secs(9), FADE), 1.0);
    }

    #[test]
    fn test_replace_after_detach_is_noop() {
        let t0 = Instant::now();
        let mut slot = SkeletonSlot::new(create_skeleton(
            SkeletonKind::Title,
            SkeletonOptions::default(),
        ));
        slot.detach();
        slot.replace("<p>Loaded</p>", t0);
        assert!(slot.is_detached());
        assert_eq!(slot.content(), None);
    }

    #[test]
    fn test_replace_helper_tolerates_missing_slot() {
        replace_skeleton(None, "orphan", Instant::now());

        let mut slot = SkeletonSlot::new(create_skeleton(
            SkeletonKind::Text,
            SkeletonOptions::default(),
        ));
        replace_skeleton(Some(&mut slot), "loaded", Instant::now());
        assert_eq!(slot.content(), Some("loaded"));
    }

    #[test]
    fn test_second_replace_keeps_first_content() {
        let t0 = Instant::now();
        let mut slot = SkeletonSlot::new(create_skeleton(
            SkeletonKind::Text,
            SkeletonOptions::default(),
        ));
        slot.replace("first", t0);
        slot.replace("second", t0 + Duration::from_millis(10));
        assert_eq!(slot.content(), Some("first"));
    }
}
