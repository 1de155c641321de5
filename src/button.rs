//! Button loading state with label stash/restore.

/// Loading state for a single action or submit button.
///
/// Entering the loading state disables the control and stashes its current
/// label; leaving it restores the stashed label exactly, whatever it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    label: String,
    loading: bool,
    stashed: Option<String>,
}

impl ButtonState {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            loading: false,
            stashed: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn enabled(&self) -> bool {
        !self.loading
    }

    /// Change the rendered label. While loading this updates the stash, so
    /// the new label is what gets restored.
    pub fn set_label(&mut self, label: impl Into<String>) {
        if self.loading {
            self.stashed = Some(label.into());
        } else {
            self.label = label.into();
        }
    }

    fn enter_loading(&mut self) {
        if self.loading {
            return;
        }
        self.stashed = Some(std::mem::take(&mut self.label));
        self.loading = true;
    }

    fn leave_loading(&mut self) {
        self.loading = false;
        if let Some(original) = self.stashed.take() {
            self.label = original;
        }
    }
}

/// Toggle a button's loading state. A missing button is a silent no-op.
pub fn set_button_loading(button: Option<&mut ButtonState>, loading: bool) {
    let Some(button) = button else {
        return;
    };
    if loading {
        button.enter_loading();
    } else {
        button.leave_loading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_restores_label_exactly() {
        let original = "Save <strong>litter</strong> \u{1F437}";
        let mut btn = ButtonState::new(original);

        set_button_loading(Some(&mut btn), true);
        assert!(btn.is_loading());
        assert!(!btn.enabled());

        set_button_loading(Some(&mut btn), false);
        assert!(!btn.is_loading());
        assert!(btn.enabled());
        assert_eq!(btn.label(), original);
    }

    #[test]
    fn test_repeated_enter_keeps_first_stash() {
        let mut btn = ButtonState::new("Record service");
        set_button_loading(Some(&mut btn), true);
        set_button_loading(Some(&mut btn), true);
        set_button_loading(Some(&mut btn), false);
        assert_eq!(btn.label(), "Record service");
    }

    #[test]
    fn test_unload_without_load_is_noop() {
        let mut btn = ButtonState::new("Add expense");
        set_button_loading(Some(&mut btn), false);
        assert_eq!(btn.label(), "Add expense");
        assert!(!btn.is_loading());
    }

    #[test]
    fn test_missing_button_is_noop() {
        set_button_loading(None, true);
        set_button_loading(None, false);
    }

    #[test]
    fn test_set_label_while_loading_restores_new_label() {
        let mut btn = ButtonState::new("Submit");
        set_button_loading(Some(&mut btn), true);
        btn.set_label("Submitted");
        set_button_loading(Some(&mut btn), false);
        assert_eq!(btn.label(), "Submitted");
    }
}
