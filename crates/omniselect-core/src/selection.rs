/// Settings consulted on every selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionPolicy {
    pub multi: bool,
    pub clear_on_selection: bool,
}

impl SelectionPolicy {
    pub const fn new(multi: bool, clear_on_selection: bool) -> Self {
        Self {
            multi,
            clear_on_selection,
        }
    }

    /// Whether this change should empty the visible options.
    ///
    /// Only additions in multi-select mode with clearing enabled qualify;
    /// removals and the very first pick (no previous value) never do.
    pub fn should_clear<V>(&self, previous: Option<&[V]>, next: &[V]) -> bool {
        if !self.multi || !self.clear_on_selection {
            return false;
        }
        previous.is_some_and(|prev| next.len() > prev.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATE: SelectionPolicy = SelectionPolicy::new(true, true);

    #[test]
    fn test_addition_clears() {
        assert!(GATE.should_clear(Some(&["A"][..]), &["A", "B"]));
    }

    #[test]
    fn test_removal_keeps() {
        assert!(!GATE.should_clear(Some(&["A", "B"][..]), &["A"]));
    }

    #[test]
    fn test_no_previous_value_keeps() {
        assert!(!GATE.should_clear(None, &["A"]));
    }

    #[test]
    fn test_empty_previous_counts_as_existing() {
        assert!(GATE.should_clear(Some(&[][..]), &["A"]));
    }

    #[test]
    fn test_disabled_modes_keep() {
        let single = SelectionPolicy::new(false, true);
        let no_clear = SelectionPolicy::new(true, false);
        assert!(!single.should_clear(Some(&["A"][..]), &["A", "B"]));
        assert!(!no_clear.should_clear(Some(&["A"][..]), &["A", "B"]));
    }
}
