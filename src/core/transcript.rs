use std::collections::VecDeque;

use crate::core::message::Message;

/// Append-only log of conversation entries, in display order.
///
/// This is the only state the rendering layer reads. It is kept separate from
/// the provider conversation context: the transcript also holds app notices
/// and in-band error entries that the provider never sees.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: VecDeque<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.entries.push_back(message);
    }

    /// Empties the log. Callers pair this with a session reset so a stale
    /// transcript never survives a session swap.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &VecDeque<Message> {
        &self.entries
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;

    #[test]
    fn append_preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("hello"));
        transcript.append(Message::bot("Hi there."));

        let entries: Vec<_> = transcript.entries().iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, TranscriptRole::User);
        assert_eq!(entries[0].content, "hello");
        assert_eq!(entries[1].role, TranscriptRole::Bot);
        assert_eq!(entries[1].content, "Hi there.");
    }

    #[test]
    fn clear_on_empty_transcript_is_a_no_op() {
        let mut transcript = Transcript::new();
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
    }

    #[test]
    fn clear_discards_all_entries() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("one"));
        transcript.append(Message::bot("two"));
        transcript.clear();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }
}
