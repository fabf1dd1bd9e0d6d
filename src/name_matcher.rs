use crate::error::{StatsError, StatsResult};

pub const MAX_SUGGESTIONS: usize = 5;

/// Display names in roster order, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct NameList {
    names: Vec<String>,
    lowered: Vec<String>,
}

impl NameList {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

pub fn build_index<I, S>(names: I) -> NameList
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    let lowered = names.iter().map(|n| n.to_lowercase()).collect();
    NameList { names, lowered }
}

pub fn suggest(index: &NameList, prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let needle = prefix.to_lowercase();
    index
        .lowered
        .iter()
        .zip(index.names.iter())
        .filter(|(lowered, _)| lowered.starts_with(&needle))
        .map(|(_, name)| name.clone())
        .take(MAX_SUGGESTIONS)
        .collect()
}

pub fn select_suggestion(suggestions: &[String], index: usize) -> StatsResult<&str> {
    suggestions
        .get(index)
        .map(String::as_str)
        .ok_or(StatsError::OutOfRange {
            index,
            len: suggestions.len(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Idle,
    Typing,
    SuggestionsVisible,
}

/// Player-name input with a suggestion dropdown.
#[derive(Debug, Clone)]
pub struct AutocompleteEntry {
    text: String,
    state: EntryState,
    suggestions: Vec<String>,
    highlighted: usize,
}

impl Default for AutocompleteEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl AutocompleteEntry {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            state: EntryState::Idle,
            suggestions: Vec::new(),
            highlighted: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn suggestions(&self) -> &[String] {
        match self.state {
            EntryState::SuggestionsVisible => &self.suggestions,
            _ => &[],
        }
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn push_char(&mut self, ch: char, index: &NameList) {
        self.text.push(ch);
        self.refresh(index);
    }

    pub fn backspace(&mut self, index: &NameList) {
        self.text.pop();
        self.refresh(index);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.hide();
    }

    pub fn focus_lost(&mut self) {
        self.hide();
    }

    pub fn highlight_next(&mut self) {
        let len = self.suggestions().len();
        if len > 0 {
            self.highlighted = (self.highlighted + 1) % len;
        }
    }

    pub fn highlight_prev(&mut self) {
        let len = self.suggestions().len();
        if len > 0 {
            self.highlighted = (self.highlighted + len - 1) % len;
        }
    }

    /// Replaces the text with the highlighted suggestion.
    pub fn commit(&mut self) -> StatsResult<String> {
        self.commit_at(self.highlighted)
    }

    pub fn commit_at(&mut self, position: usize) -> StatsResult<String> {
        let chosen = select_suggestion(self.suggestions(), position)?.to_string();
        self.text = chosen.clone();
        self.hide();
        Ok(chosen)
    }

    fn refresh(&mut self, index: &NameList) {
        if self.text.is_empty() {
            self.hide();
            return;
        }
        self.suggestions = suggest(index, &self.text);
        self.highlighted = 0;
        self.state = if self.suggestions.is_empty() {
            EntryState::Typing
        } else {
            EntryState::SuggestionsVisible
        };
    }

    fn hide(&mut self) {
        self.suggestions.clear();
        self.highlighted = 0;
        self.state = EntryState::Idle;
    }
}
