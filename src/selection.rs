// selection.rs - the externally owned "which orb is selected" state

/// Receives selection changes produced by the sphere (clicks).
pub trait SelectionSink {
    fn select(&mut self, index: Option<usize>);
}

/// Holds an optional selected index and the search / navigation helpers
/// around it. Passed explicitly to whoever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<usize>,
    total_items: usize,
}

impl SelectionState {
    pub fn new(total_items: usize) -> Self {
        Self {
            selected: None,
            total_items,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// A rebuilt sphere may be smaller; drop a selection it cannot hold.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        if self.selected.is_some_and(|i| i >= total_items) {
            self.select(None);
        }
    }

    pub fn clear(&mut self) {
        self.select(None);
    }

    /// Select by 1-based spot number. Out of range leaves the state alone.
    pub fn navigate_to_spot(&mut self, number: usize) -> bool {
        if (1..=self.total_items).contains(&number) {
            log::debug!("navigating to spot {number}");
            self.select(Some(number - 1));
            true
        } else {
            false
        }
    }

    /// Parse a search box entry ("1".."N").
    pub fn search(&mut self, query: &str) -> bool {
        match query.trim().parse::<usize>() {
            Ok(number) if self.navigate_to_spot(number) => true,
            _ => {
                log::debug!("rejected orb search {query:?}");
                false
            }
        }
    }

    pub fn selected_spot_number(&self) -> Option<usize> {
        self.selected.map(|i| i + 1)
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    /// Text mirrored into the search box.
    pub fn search_value(&self) -> String {
        self.selected_spot_number().map(|n| n.to_string()).unwrap_or_default()
    }
}

impl SelectionSink for SelectionState {
    fn select(&mut self, index: Option<usize>) {
        if self.selected != index {
            log::debug!("selection {:?} -> {:?}", self.selected, index);
        }
        self.selected = index;
    }
}
