//! Field journal board.
//!
//! An in-memory list of observation posts. Each post has a title, a
//! description and a set of tags; the board can be filtered by tag.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Reasons a post is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    /// Title is empty after trimming.
    #[error("Journal entry needs a title")]
    EmptyTitle,

    /// Description is empty after trimming.
    #[error("Journal entry needs a description")]
    EmptyDescription,

    /// No entry with that id.
    #[error("No journal entry with id {0}")]
    NotFound(u64),
}

/// A posted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Board-unique id, increasing with posting order.
    pub id: u64,
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: String,
    /// Normalised tags (trimmed, lowercase, no duplicates).
    pub tags: Vec<String>,
}

impl JournalEntry {
    /// Whether the entry carries `tag` (case-insensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.tags.iter().any(|t| *t == tag)
    }
}

/// The board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalBoard {
    entries: Vec<JournalEntry>,
    next_id: u64,
}

fn normalise_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

impl JournalBoard {
    /// Empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Post an entry.
    ///
    /// # Errors
    ///
    /// Rejects a blank title or description; the board is left unchanged.
    pub fn post<I, S>(
        &mut self,
        title: &str,
        description: &str,
        tags: I,
    ) -> Result<&JournalEntry, JournalError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let title = title.trim();
        if title.is_empty() {
            return Err(JournalError::EmptyTitle);
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(JournalError::EmptyDescription);
        }

        self.next_id += 1;
        let entry = JournalEntry {
            id: self.next_id,
            title: title.to_string(),
            description: description.to_string(),
            tags: normalise_tags(tags),
        };
        debug!(id = entry.id, tags = ?entry.tags, "journal entry posted");
        self.entries.push(entry);

        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    /// Post with tags given as one comma-separated string.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post`].
    pub fn post_csv(
        &mut self,
        title: &str,
        description: &str,
        tags: &str,
    ) -> Result<&JournalEntry, JournalError> {
        self.post(title, description, tags.split(','))
    }

    /// Entries carrying `tag`, newest first.
    ///
    /// An empty tag or `"all"` returns every entry.
    #[must_use]
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&JournalEntry> {
        let tag = tag.trim();
        let everything = tag.is_empty() || tag.eq_ignore_ascii_case("all");
        self.entries
            .iter()
            .rev()
            .filter(|e| everything || e.has_tag(tag))
            .collect()
    }

    /// Every entry, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<&JournalEntry> {
        self.entries.iter().rev().collect()
    }

    /// Every distinct tag, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self
            .entries
            .iter()
            .flat_map(|e| e.tags.iter().map(String::as_str))
            .collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::NotFound`] for an unknown id.
    pub fn remove(&mut self, id: u64) -> Result<JournalEntry, JournalError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(JournalError::NotFound(id))?;
        Ok(self.entries.remove(index))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn board() -> JournalBoard {
        let mut board = JournalBoard::new();
        board
            .post("Reef survey", "Coral bleaching on the north wall", ["Reef", "coral"])
            .unwrap();
        board
            .post("Plankton bloom", "Green water near the buoy", ["plankton"])
            .unwrap();
        board
            .post_csv("Night dive", "Octopus hunting at the reef", "reef, night ,")
            .unwrap();
        board
    }

    #[test]
    fn test_post_trims_and_normalises() {
        let mut board = JournalBoard::new();
        let entry = board
            .post("  Title ", " Body  ", [" Reef", "REEF", "", "coral "])
            .unwrap();
        assert_eq!(entry.id, 1);
        assert_eq!(entry.title, "Title");
        assert_eq!(entry.description, "Body");
        assert_eq!(entry.tags, vec!["reef", "coral"]);
    }

    #[test]
    fn test_post_rejects_blank_fields() {
        let mut board = JournalBoard::new();
        assert_eq!(
            board.post("   ", "body", ["x"]).unwrap_err(),
            JournalError::EmptyTitle
        );
        assert_eq!(
            board.post("title", "\n\t", ["x"]).unwrap_err(),
            JournalError::EmptyDescription
        );
        assert!(board.is_empty());
    }

    #[test]
    fn test_filter_by_tag() {
        let board = board();
        let reef: Vec<&str> = board
            .filter_by_tag("REEF")
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(reef, vec!["Night dive", "Reef survey"]);

        assert_eq!(board.filter_by_tag("plankton").len(), 1);
        assert!(board.filter_by_tag("whales").is_empty());
    }

    #[test]
    fn test_filter_all() {
        let board = board();
        assert_eq!(board.filter_by_tag("all").len(), 3);
        assert_eq!(board.filter_by_tag("").len(), 3);
        assert_eq!(board.entries()[0].title, "Night dive");
    }

    #[test]
    fn test_tags() {
        assert_eq!(board().tags(), vec!["coral", "night", "plankton", "reef"]);
    }

    #[test]
    fn test_get_and_remove() {
        let mut board = board();
        assert_eq!(board.get(2).unwrap().title, "Plankton bloom");

        let removed = board.remove(2).unwrap();
        assert_eq!(removed.id, 2);
        assert!(board.get(2).is_none());
        assert_eq!(board.remove(2).unwrap_err(), JournalError::NotFound(2));

        // Ids are never reused
        let entry = board.post("Again", "More", Vec::<String>::new()).unwrap();
        assert_eq!(entry.id, 4);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(JournalError::EmptyTitle.to_string(), "Journal entry needs a title");
        assert_eq!(JournalError::NotFound(7).to_string(), "No journal entry with id 7");
    }
}
