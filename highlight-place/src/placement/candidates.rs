use super::slot::SlotId;

/// Slots the object currently overlaps, oldest entry first.
///
/// Holds no duplicates. The last element is the active candidate used for
/// highlighting and for placement on release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    slots: Vec<SlotId>,
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `slot` unless it is already present. Returns true if appended.
    pub fn insert(&mut self, slot: SlotId) -> bool {
        if self.contains(slot) {
            return false;
        }
        self.slots.push(slot);
        true
    }

    /// Remove `slot` wherever it sits. Returns true if it was present.
    pub fn remove(&mut self, slot: SlotId) -> bool {
        match self.slots.iter().position(|s| *s == slot) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Most recently entered slot still overlapped.
    pub fn active(&self) -> Option<SlotId> {
        self.slots.last().copied()
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.slots.contains(&slot)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.iter().copied()
    }

    pub fn as_slice(&self) -> &[SlotId] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent_and_keeps_entry_order() {
        let mut list = CandidateList::new();
        assert!(list.insert(SlotId(1)));
        assert!(list.insert(SlotId(2)));
        assert!(!list.insert(SlotId(1)));
        assert_eq!(list.as_slice(), &[SlotId(1), SlotId(2)]);
        assert_eq!(list.active(), Some(SlotId(2)));
    }

    #[test]
    fn removing_the_tail_exposes_the_previous_entry() {
        let mut list = CandidateList::new();
        list.insert(SlotId(1));
        list.insert(SlotId(2));
        list.insert(SlotId(3));
        assert!(list.remove(SlotId(3)));
        assert_eq!(list.active(), Some(SlotId(2)));
        assert!(list.remove(SlotId(1)));
        assert_eq!(list.as_slice(), &[SlotId(2)]);
        assert!(!list.remove(SlotId(9)));
    }

    #[test]
    fn matches_entered_but_not_exited_for_interleaved_events() {
        // (slot, entering)
        let events = [
            (1, true),
            (2, true),
            (3, true),
            (2, false),
            (4, true),
            (1, false),
            (2, true),
            (3, false),
        ];
        let mut list = CandidateList::new();
        let mut model: Vec<u64> = Vec::new();
        for (slot, entering) in events {
            if entering {
                list.insert(SlotId(slot));
                if !model.contains(&slot) {
                    model.push(slot);
                }
            } else {
                list.remove(SlotId(slot));
                model.retain(|s| *s != slot);
            }
            let current: Vec<u64> = list.iter().map(|s| s.0).collect();
            assert_eq!(current, model);
        }
        assert_eq!(list.active(), Some(SlotId(2)));
    }

    #[test]
    fn empty_list_has_no_active_candidate() {
        let mut list = CandidateList::new();
        assert_eq!(list.active(), None);
        list.insert(SlotId(5));
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.active(), None);
    }
}
