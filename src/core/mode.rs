use crate::core::selector::DateRangeSelector;
use crate::domain::model::SelectionMode;

/// Owns the selection mode. Switching modes always drops the current
/// selection so a waitlist range is never reused as a booking range.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionModeController {
    mode: SelectionMode,
}

impl SelectionModeController {
    pub fn new(mode: SelectionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn toggle(&mut self, selector: &mut DateRangeSelector) -> SelectionMode {
        self.mode = self.mode.toggled();
        selector.clear();
        tracing::debug!("Selection mode switched to {}", self.mode);
        self.mode
    }
}
