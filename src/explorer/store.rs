use eframe::egui::Pos2;

use crate::archive::Record;

/// Mutable per-record render state.
///
/// Each field has exactly one writer:
/// - `position`: the layout engine ([`RecordStore::place`]).
/// - `visible`: the render pipeline ([`RecordStore::mark_visible`]).
/// - `selected`: the selection operation ([`RecordStore::select`]).
/// - `search_match`: search ([`RecordStore::set_search_matches`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordState {
    pub position: Pos2,
    pub selected: bool,
    pub search_match: bool,
    pub visible: bool,
}

impl Default for RecordState {
    fn default() -> Self {
        Self {
            position: Pos2::ZERO,
            selected: false,
            search_match: false,
            visible: false,
        }
    }
}

pub struct RecordStore {
    records: Vec<Record>,
    states: Vec<RecordState>,
    selected: Option<usize>,
    search_match_count: usize,
    layout_revision: u64,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        let states = vec![RecordState::default(); records.len()];
        Self {
            records,
            states,
            selected: None,
            search_match_count: 0,
            layout_revision: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn state(&self, index: usize) -> Option<&RecordState> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[RecordState] {
        &self.states
    }

    pub fn position(&self, index: usize) -> Option<Pos2> {
        self.states.get(index).map(|state| state.position)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.states.iter().map(|state| state.position)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected.and_then(|index| self.records.get(index))
    }

    pub fn search_match_count(&self) -> usize {
        self.search_match_count
    }

    pub fn search_matches(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.search_match)
            .map(|(index, _)| index)
    }

    /// Bumped after every completed layout pass.
    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    pub(in crate::explorer) fn place(&mut self, index: usize, position: Pos2) {
        if let Some(state) = self.states.get_mut(index) {
            state.position = position;
        }
    }

    pub(in crate::explorer) fn finish_layout(&mut self) {
        self.layout_revision = self.layout_revision.wrapping_add(1);
    }

    pub(in crate::explorer) fn mark_visible(&mut self, visible: &[usize]) {
        for state in &mut self.states {
            state.visible = false;
        }
        for &index in visible {
            if let Some(state) = self.states.get_mut(index) {
                state.visible = true;
            }
        }
    }

    /// Returns whether the selection changed.
    pub(in crate::explorer) fn select(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&index| index < self.records.len());
        if self.selected == index {
            return false;
        }

        if let Some(previous) = self.selected
            && let Some(state) = self.states.get_mut(previous)
        {
            state.selected = false;
        }
        if let Some(next) = index
            && let Some(state) = self.states.get_mut(next)
        {
            state.selected = true;
        }
        self.selected = index;
        true
    }

    pub(in crate::explorer) fn set_search_matches(&mut self, matches: &[usize]) {
        for state in &mut self.states {
            state.search_match = false;
        }
        let mut count = 0usize;
        for &index in matches {
            if let Some(state) = self.states.get_mut(index)
                && !state.search_match
            {
                state.search_match = true;
                count += 1;
            }
        }
        self.search_match_count = count;
    }
}
