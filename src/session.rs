//! Per-session selection state.
//!
//! Holds what the user has drawn so far: the current random pick, the
//! current quiz item, and whether its answer is showing. Records are
//! remembered by name and looked up again in the store on access.

use rand::Rng;

use crate::models::FlowerRecord;
use crate::store::RecordStore;

#[derive(Debug, Clone, Default)]
pub struct Session {
    random_pick: Option<String>,
    quiz_item: Option<String>,
    show_answer: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current random pick.
    pub fn draw_random<'s, R: Rng + ?Sized>(
        &mut self,
        store: &'s RecordStore,
        rng: &mut R,
    ) -> Option<&'s FlowerRecord> {
        let pick = store.random_pick_with(rng);
        self.random_pick = pick.map(|r| r.name.clone());
        pick
    }

    pub fn random_pick<'s>(&self, store: &'s RecordStore) -> Option<&'s FlowerRecord> {
        self.random_pick
            .as_deref()
            .and_then(|name| store.get_by_name(name))
    }

    /// Moves to a new quiz question with the answer hidden.
    pub fn next_question<'s, R: Rng + ?Sized>(
        &mut self,
        store: &'s RecordStore,
        rng: &mut R,
    ) -> Option<&'s FlowerRecord> {
        let item = store.random_pick_with(rng);
        self.quiz_item = item.map(|r| r.name.clone());
        self.show_answer = false;
        item
    }

    /// The current quiz question, drawing the first one if needed.
    pub fn current_quiz<'s, R: Rng + ?Sized>(
        &mut self,
        store: &'s RecordStore,
        rng: &mut R,
    ) -> Option<&'s FlowerRecord> {
        match self.quiz_item.as_deref().and_then(|name| store.get_by_name(name)) {
            Some(record) => Some(record),
            None => self.next_question(store, rng),
        }
    }

    pub fn reveal(&mut self) {
        self.show_answer = true;
    }

    pub fn show_answer(&self) -> bool {
        self.show_answer
    }
}
