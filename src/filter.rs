// Channel filter state
//
// Owned by the UI loop. The input dispatcher is the only writer; message
// rendering and the transcript title read it by reference.

/// The active channel filter (None = show every channel)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    active: Option<String>,
}

impl FilterState {
    /// Filter on a channel name; an empty name clears the filter
    pub fn set(&mut self, channel: impl Into<String>) {
        let channel = channel.into();
        self.active = if channel.is_empty() {
            None
        } else {
            Some(channel)
        };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unfiltered() {
        assert_eq!(FilterState::default().active(), None);
    }

    #[test]
    fn empty_name_means_no_filter() {
        let mut filter = FilterState::default();
        filter.set("general");
        assert_eq!(filter.active(), Some("general"));

        filter.set("");
        assert!(!filter.is_active());
    }

    #[test]
    fn clear_resets() {
        let mut filter = FilterState::default();
        filter.set("random");
        filter.clear();
        assert_eq!(filter, FilterState::default());
    }
}
