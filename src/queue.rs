use std::collections::VecDeque;

use tracing::debug;

use crate::models::Listing;
use crate::swipe::SwipeDirection;

/// What the reviewer is looking at right now.
#[derive(Debug, PartialEq)]
pub enum TriageState<'a, T> {
    /// Reviewing items pulled back out of the passed bin. Always shown before the deck resumes.
    Recovering { item: &'a T, remaining: usize },
    /// Walking the filtered deck.
    Reviewing { cursor: usize, item: &'a T },
    /// Cursor has run off the end of the deck and nothing is being recovered.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Recovery,
    Deck(usize),
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed { id: String, recovered: bool },
    Saved { id: String, recovered: bool },
    AlreadySaved { id: String },
    Undone { id: String },
    Recovered { count: usize },
    BinCleared { count: usize },
    Bookmarked { id: String },
    Unbookmarked { id: String },
}

/// Per-screen triage over a filtered deck: a cursor, a saved queue, a passed bin and a
/// recovery queue. An id is never in both the saved queue and the passed bin.
#[derive(Debug, Clone)]
pub struct TriageQueue<T> {
    deck: Vec<T>,
    cursor: usize,
    saved: Vec<T>,
    passed: Vec<T>,
    recovery: VecDeque<T>,
    query: String,
}

impl<T: Listing + Clone> TriageQueue<T> {
    pub fn new(deck: Vec<T>, query: &str) -> Self {
        Self {
            deck,
            cursor: 0,
            saved: Vec::new(),
            passed: Vec::new(),
            recovery: VecDeque::new(),
            query: query.to_string(),
        }
    }

    /// Installs a freshly filtered deck. A new query or a different deck length starts a new
    /// review session: cursor, passed bin and recovery queue are reset. Saved items stay.
    pub fn refresh(&mut self, deck: Vec<T>, query: &str) {
        let changed = query != self.query || deck.len() != self.deck.len();
        self.deck = deck;
        if changed {
            debug!(query, len = self.deck.len(), "triage session reset");
            self.query = query.to_string();
            self.cursor = 0;
            self.passed.clear();
            self.recovery.clear();
        }
    }

    fn focus(&self) -> Focus {
        if !self.recovery.is_empty() {
            Focus::Recovery
        } else if self.cursor < self.deck.len() {
            Focus::Deck(self.cursor)
        } else {
            Focus::Exhausted
        }
    }

    pub fn state(&self) -> TriageState<'_, T> {
        match self.focus() {
            Focus::Recovery => TriageState::Recovering {
                item: &self.recovery[0],
                remaining: self.recovery.len(),
            },
            Focus::Deck(cursor) => TriageState::Reviewing {
                cursor,
                item: &self.deck[cursor],
            },
            Focus::Exhausted => TriageState::Exhausted,
        }
    }

    pub fn current(&self) -> Option<&T> {
        match self.state() {
            TriageState::Recovering { item, .. } | TriageState::Reviewing { item, .. } => {
                Some(item)
            }
            TriageState::Exhausted => None,
        }
    }

    pub fn skip(&mut self) -> Option<Outcome> {
        let (item, recovered) = match self.focus() {
            Focus::Recovery => (self.recovery.pop_front()?, true),
            Focus::Deck(cursor) => {
                self.cursor += 1;
                (self.deck[cursor].clone(), false)
            }
            Focus::Exhausted => return None,
        };
        let id = item.id().to_string();
        self.saved.retain(|s| s.id() != id);
        self.passed.push(item);
        debug!(id, recovered, "passed");
        Some(Outcome::Passed { id, recovered })
    }

    pub fn save(&mut self) -> Option<Outcome> {
        let (item, recovered) = match self.focus() {
            Focus::Recovery => (self.recovery.pop_front()?, true),
            Focus::Deck(cursor) => {
                self.cursor += 1;
                (self.deck[cursor].clone(), false)
            }
            Focus::Exhausted => return None,
        };
        let id = item.id().to_string();
        if self.is_saved(&id) {
            return Some(Outcome::AlreadySaved { id });
        }
        self.passed.retain(|p| p.id() != id);
        self.saved.push(item);
        debug!(id, recovered, "saved");
        Some(Outcome::Saved { id, recovered })
    }

    pub fn swipe(&mut self, direction: SwipeDirection) -> Option<Outcome> {
        match direction {
            SwipeDirection::Left => self.skip(),
            SwipeDirection::Right => self.save(),
        }
    }

    /// Undo only reverses main-deck passes. While recovered items are up it is unavailable,
    /// so a recovered item that gets passed again can only come back through recovery.
    pub fn can_undo(&self) -> bool {
        !self.passed.is_empty() && self.focus() != Focus::Recovery
    }

    pub fn undo(&mut self) -> Option<Outcome> {
        if !self.can_undo() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        let item = self.passed.pop()?;
        let id = item.id().to_string();
        debug!(id, cursor = self.cursor, "undo");
        Some(Outcome::Undone { id })
    }

    pub fn recover(&mut self, id: &str) -> Option<Outcome> {
        let idx = self.passed.iter().position(|p| p.id() == id)?;
        let item = self.passed.remove(idx);
        self.recovery.push_back(item);
        debug!(id, "recovered");
        Some(Outcome::Recovered { count: 1 })
    }

    pub fn recover_all(&mut self) -> Option<Outcome> {
        if self.passed.is_empty() {
            return None;
        }
        let count = self.passed.len();
        self.recovery.extend(self.passed.drain(..));
        debug!(count, "recovered all");
        Some(Outcome::Recovered { count })
    }

    pub fn clear_bin(&mut self) -> Outcome {
        let count = self.passed.len();
        self.passed.clear();
        debug!(count, "bin cleared");
        Outcome::BinCleared { count }
    }

    /// Bookmark toggle from the list view. Never moves the cursor.
    pub fn toggle_saved(&mut self, item: &T) -> Outcome {
        let id = item.id().to_string();
        if self.remove_saved(&id) {
            Outcome::Unbookmarked { id }
        } else {
            self.passed.retain(|p| p.id() != id);
            self.saved.push(item.clone());
            Outcome::Bookmarked { id }
        }
    }

    pub fn remove_saved(&mut self, id: &str) -> bool {
        let before = self.saved.len();
        self.saved.retain(|s| s.id() != id);
        self.saved.len() != before
    }

    /// Drops the given ids from the saved queue, e.g. once they have been paid for.
    pub fn take_saved(&mut self, ids: &[String]) {
        self.saved.retain(|s| !ids.iter().any(|id| id == s.id()));
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.iter().any(|s| s.id() == id)
    }

    pub fn deck(&self) -> &[T] {
        &self.deck
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn saved(&self) -> &[T] {
        &self.saved
    }

    pub fn passed(&self) -> &[T] {
        &self.passed
    }

    pub fn recovery(&self) -> &VecDeque<T> {
        &self.recovery
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[derive(Debug, Clone, PartialEq)]
    struct Card(&'static str);

    impl Listing for Card {
        fn id(&self) -> &str {
            self.0
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.0]
        }

        fn headline(&self) -> String {
            self.0.to_string()
        }
    }

    fn deck() -> Vec<Card> {
        vec![Card("J1"), Card("J2"), Card("J3")]
    }

    fn ids(items: &[Card]) -> Vec<&'static str> {
        items.iter().map(|c| c.0).collect()
    }

    fn current(queue: &TriageQueue<Card>) -> Option<&'static str> {
        queue.current().map(|c| c.0)
    }

    fn assert_exclusive(queue: &TriageQueue<Card>) {
        for s in queue.saved() {
            assert!(
                !queue.passed().iter().any(|p| p.0 == s.0),
                "{} is both saved and passed",
                s.0
            );
        }
        assert!(queue.cursor() <= queue.deck().len());
    }

    #[test]
    fn test_walkthrough_skip_save_recover_skip() {
        let mut queue = TriageQueue::new(deck(), "");
        assert_eq!(current(&queue), Some("J1"));

        queue.skip();
        assert_eq!(ids(queue.passed()), vec!["J1"]);
        assert_eq!(current(&queue), Some("J2"));

        queue.save();
        assert_eq!(ids(queue.saved()), vec!["J2"]);
        assert_eq!(current(&queue), Some("J3"));

        queue.recover("J1");
        assert!(queue.passed().is_empty());
        assert_eq!(queue.recovery().len(), 1);
        assert_eq!(current(&queue), Some("J1"));

        assert_eq!(
            queue.skip(),
            Some(Outcome::Passed {
                id: "J1".to_string(),
                recovered: true
            })
        );
        assert_eq!(ids(queue.passed()), vec!["J1"]);
        assert!(queue.recovery().is_empty());
        assert_eq!(current(&queue), Some("J3"));
    }

    #[test]
    fn test_state_prioritizes_recovery() {
        let mut queue = TriageQueue::new(deck(), "");
        assert_eq!(
            queue.state(),
            TriageState::Reviewing {
                cursor: 0,
                item: &Card("J1")
            }
        );
        queue.skip();
        queue.recover_all();
        assert_eq!(
            queue.state(),
            TriageState::Recovering {
                item: &Card("J1"),
                remaining: 1
            }
        );
    }

    #[test]
    fn test_recovered_items_come_back_in_recovery_order_before_deck() {
        let mut queue = TriageQueue::new(vec![Card("A"), Card("B"), Card("C"), Card("D")], "");
        queue.skip();
        queue.skip();
        queue.skip();
        assert_eq!(current(&queue), Some("D"));

        queue.recover("C");
        queue.recover("A");
        assert_eq!(current(&queue), Some("C"));
        queue.save();
        assert_eq!(current(&queue), Some("A"));
        queue.save();
        assert_eq!(current(&queue), Some("D"));
        assert_eq!(queue.cursor(), 3);
        assert_eq!(ids(queue.saved()), vec!["C", "A"]);
        assert_eq!(ids(queue.passed()), vec!["B"]);
    }

    #[test]
    fn test_recover_all_keeps_bin_order() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.skip();
        queue.skip();
        assert_eq!(queue.recover_all(), Some(Outcome::Recovered { count: 2 }));
        assert!(queue.passed().is_empty());
        assert_eq!(current(&queue), Some("J1"));
        queue.skip();
        assert_eq!(current(&queue), Some("J2"));
        queue.skip();
        assert_eq!(current(&queue), Some("J3"));
        assert!(queue.recover_all().is_some());
        assert_eq!(queue.recover_all(), None);
    }

    #[test]
    fn test_skip_then_undo_restores_cursor_and_bin() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.save();
        let saved_before = ids(queue.saved());
        let cursor_before = queue.cursor();

        queue.skip();
        assert_eq!(
            queue.undo(),
            Some(Outcome::Undone {
                id: "J2".to_string()
            })
        );
        assert_eq!(queue.cursor(), cursor_before);
        assert!(queue.passed().is_empty());
        assert_eq!(ids(queue.saved()), saved_before);
        assert_eq!(current(&queue), Some("J2"));
    }

    #[test]
    fn test_undo_unavailable_while_recovering_or_bin_empty() {
        let mut queue = TriageQueue::new(deck(), "");
        assert!(!queue.can_undo());
        assert_eq!(queue.undo(), None);

        queue.skip();
        queue.skip();
        queue.recover("J1");
        assert!(!queue.can_undo());
        assert_eq!(queue.undo(), None);
        assert_eq!(queue.cursor(), 2);
    }

    #[test]
    fn test_exhausted_deck_ignores_skip_and_save() {
        let mut queue = TriageQueue::new(vec![Card("A")], "");
        queue.skip();
        assert_eq!(queue.state(), TriageState::Exhausted);
        assert_eq!(queue.skip(), None);
        assert_eq!(queue.save(), None);
        assert_eq!(queue.cursor(), 1);
        assert_eq!(ids(queue.passed()), vec!["A"]);

        queue.undo();
        assert_eq!(current(&queue), Some("A"));
    }

    #[test]
    fn test_empty_deck_is_exhausted() {
        let mut queue: TriageQueue<Card> = TriageQueue::new(Vec::new(), "");
        assert_eq!(queue.state(), TriageState::Exhausted);
        assert_eq!(queue.swipe(SwipeDirection::Right), None);
    }

    #[test]
    fn test_save_does_not_duplicate_but_still_advances() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.toggle_saved(&Card("J1"));
        assert_eq!(
            queue.save(),
            Some(Outcome::AlreadySaved {
                id: "J1".to_string()
            })
        );
        assert_eq!(ids(queue.saved()), vec!["J1"]);
        assert_eq!(current(&queue), Some("J2"));
    }

    #[test]
    fn test_toggle_saved_is_idempotent_pair() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.skip();
        assert!(matches!(
            queue.toggle_saved(&Card("J3")),
            Outcome::Bookmarked { .. }
        ));
        assert!(matches!(
            queue.toggle_saved(&Card("J3")),
            Outcome::Unbookmarked { .. }
        ));
        assert!(queue.saved().is_empty());
        assert_eq!(queue.cursor(), 1);
    }

    #[test]
    fn test_bookmarking_a_passed_item_takes_it_out_of_the_bin() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.skip();
        queue.toggle_saved(&Card("J1"));
        assert_eq!(ids(queue.saved()), vec!["J1"]);
        assert!(queue.passed().is_empty());
        assert_exclusive(&queue);
    }

    #[test]
    fn test_clear_bin_discards_without_recovering() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.skip();
        queue.skip();
        assert_eq!(queue.clear_bin(), Outcome::BinCleared { count: 2 });
        assert!(queue.passed().is_empty());
        assert!(queue.recovery().is_empty());
        assert_eq!(current(&queue), Some("J3"));
    }

    #[test]
    fn test_refresh_resets_on_query_or_length_change_only() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.skip();
        queue.save();

        queue.refresh(deck(), "");
        assert_eq!(queue.cursor(), 2);
        assert_eq!(queue.passed().len(), 1);

        queue.refresh(vec![Card("J2"), Card("J3")], "");
        assert_eq!(queue.cursor(), 0);
        assert!(queue.passed().is_empty());
        assert_eq!(ids(queue.saved()), vec!["J2"]);

        queue.skip();
        queue.recover_all();
        queue.refresh(vec![Card("J2"), Card("J3")], "j");
        assert_eq!(queue.query(), "j");
        assert_eq!(queue.cursor(), 0);
        assert!(queue.recovery().is_empty());
    }

    #[test]
    fn test_take_and_remove_saved() {
        let mut queue = TriageQueue::new(deck(), "");
        queue.save();
        queue.save();
        queue.save();
        queue.take_saved(&["J1".to_string(), "J3".to_string()]);
        assert_eq!(ids(queue.saved()), vec!["J2"]);
        assert!(queue.remove_saved("J2"));
        assert!(!queue.remove_saved("J2"));
    }

    #[test]
    fn test_random_action_sequences_keep_saved_and_passed_disjoint() {
        let mut rng = StdRng::seed_from_u64(42);
        let names = ["A", "B", "C", "D", "E", "F"];

        for _ in 0..200 {
            let cards: Vec<Card> = names.iter().copied().map(Card).collect();
            let mut queue = TriageQueue::new(cards.clone(), "");
            for _ in 0..40 {
                match rng.gen_range(0..8) {
                    0 => {
                        queue.skip();
                    }
                    1 => {
                        queue.save();
                    }
                    2 => {
                        queue.undo();
                    }
                    3 => {
                        let pick = names[rng.gen_range(0..names.len())];
                        queue.recover(pick);
                    }
                    4 => {
                        queue.recover_all();
                    }
                    5 => {
                        queue.clear_bin();
                    }
                    6 => {
                        let pick = cards[rng.gen_range(0..cards.len())].clone();
                        queue.toggle_saved(&pick);
                    }
                    _ => {
                        let direction = if rng.gen_bool(0.5) {
                            SwipeDirection::Left
                        } else {
                            SwipeDirection::Right
                        };
                        queue.swipe(direction);
                    }
                }
                assert_exclusive(&queue);
            }
        }
    }
}
