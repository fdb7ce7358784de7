//! Which collections exist and which one is current.

use crate::collection::Collection;
use crate::ids::CollectionId;

/// Collections known to the client plus the current selection.
///
/// `selected_id`, when set, always names an element of `collections`;
/// [`SelectionState::repair`] restores that after any replacement of the
/// list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub collections: Vec<Collection>,
    pub selected_id: Option<CollectionId>,
}

impl SelectionState {
    pub fn find(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn find_mut(&mut self, id: CollectionId) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CollectionId) -> bool {
        self.find(id).is_some()
    }

    /// The selected collection, resolved from the live list so renames and
    /// item merges are visible without a separate reference to update.
    pub fn selected(&self) -> Option<&Collection> {
        self.selected_id.and_then(|id| self.find(id))
    }

    pub fn is_selected(&self, id: CollectionId) -> bool {
        self.selected_id == Some(id)
    }

    /// Clears a selection that no longer points at a known collection.
    /// Returns true when something was cleared.
    pub fn repair(&mut self) -> bool {
        match self.selected_id {
            Some(id) if !self.contains(id) => {
                self.selected_id = None;
                true
            }
            _ => false,
        }
    }
}

/// What subscribers see after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub state: SelectionState,
    pub loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(id: i64, name: &str) -> Collection {
        Collection {
            id: CollectionId::new(id),
            name: Some(name.to_string()),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_selected_resolves_from_list() {
        let mut state = SelectionState {
            collections: vec![collection(1, "Seasonal"), collection(2, "Classics")],
            selected_id: Some(CollectionId::new(2)),
        };

        state.find_mut(CollectionId::new(2)).unwrap().name = Some("Old".to_string());

        assert_eq!(state.selected().unwrap().display_name(), "Old");
    }

    #[test]
    fn test_repair_clears_dangling_selection() {
        let mut state = SelectionState {
            collections: vec![collection(1, "Seasonal")],
            selected_id: Some(CollectionId::new(9)),
        };

        assert!(state.repair());
        assert_eq!(state.selected_id, None);
        assert!(!state.repair());
    }

    #[test]
    fn test_repair_keeps_valid_selection() {
        let mut state = SelectionState {
            collections: vec![collection(1, "Seasonal")],
            selected_id: Some(CollectionId::new(1)),
        };

        assert!(!state.repair());
        assert!(state.is_selected(CollectionId::new(1)));
    }
}
