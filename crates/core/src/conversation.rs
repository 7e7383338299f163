//! Conversation-related types.

use alduin_model::{Segment, ToolResult, ToolUse, Turn, tool_uses};

/// The log of a conversation.
///
/// The log only grows: turns are appended by the agent and never rewritten.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Returns all turns, oldest first.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the most recent turn.
    #[inline]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    #[inline]
    pub(crate) fn push_user(&mut self, text: String) {
        self.turns.push(Turn::User(text));
    }

    #[inline]
    pub(crate) fn push_assistant(&mut self, segments: Vec<Segment>) {
        self.turns.push(Turn::Assistant(segments));
    }

    #[inline]
    pub(crate) fn push_tool_results(&mut self, results: Vec<ToolResult>) {
        debug_assert!(
            self.pending_tool_uses()
                .map(|uses| uses.len() == results.len())
                .unwrap_or(false),
            "tool results must answer the last assistant turn"
        );
        self.turns.push(Turn::ToolResults(results));
    }

    /// Returns the tool uses of the last turn, if it is an assistant turn
    /// still waiting for their results.
    pub fn pending_tool_uses(&self) -> Option<Vec<&ToolUse>> {
        let Some(Turn::Assistant(segments)) = self.turns.last() else {
            return None;
        };
        let uses: Vec<_> = tool_uses(segments).collect();
        (!uses.is_empty()).then_some(uses)
    }

    /// Checks that every assistant turn with tool uses is followed by
    /// exactly one turn of results that answer them in order.
    ///
    /// The last turn may still be waiting for its results.
    pub fn is_consistent(&self) -> bool {
        let mut turns = self.turns.iter().peekable();
        while let Some(turn) = turns.next() {
            match turn {
                Turn::Assistant(segments) => {
                    let uses: Vec<_> = tool_uses(segments).collect();
                    if uses.is_empty() {
                        continue;
                    }
                    match turns.peek() {
                        None => {}
                        Some(Turn::ToolResults(results)) => {
                            let matched = uses.len() == results.len()
                                && uses
                                    .iter()
                                    .zip(results)
                                    .all(|(call, result)| call.id == result.id);
                            if !matched {
                                return false;
                            }
                            turns.next();
                        }
                        Some(_) => return false,
                    }
                }
                // Results never appear without the assistant turn that
                // asked for them.
                Turn::ToolResults(_) => return false,
                Turn::User(_) => {}
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn call(id: &str) -> Segment {
        Segment::ToolUse(ToolUse {
            id: id.to_owned(),
            name: "read_file".to_owned(),
            arguments: Map::new(),
        })
    }

    fn result(id: &str) -> ToolResult {
        ToolResult {
            id: id.to_owned(),
            content: "ok".to_owned(),
            is_error: false,
        }
    }

    #[test]
    fn test_pending_tool_uses() {
        let mut conversation = Conversation::default();
        assert!(conversation.pending_tool_uses().is_none());

        conversation.push_user("Hi".to_owned());
        conversation.push_assistant(vec![Segment::Text("Hello!".to_owned())]);
        assert!(conversation.pending_tool_uses().is_none());

        conversation.push_user("Read both".to_owned());
        conversation.push_assistant(vec![
            Segment::Text("Sure.".to_owned()),
            call("a"),
            call("b"),
        ]);
        let ids: Vec<_> = conversation
            .pending_tool_uses()
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(conversation.is_consistent());

        conversation.push_tool_results(vec![result("a"), result("b")]);
        assert!(conversation.pending_tool_uses().is_none());
        assert!(conversation.is_consistent());
        assert_eq!(conversation.len(), 5);
    }

    #[test]
    fn test_inconsistent_logs() {
        let mut out_of_order = Conversation::default();
        out_of_order.push_user("Go".to_owned());
        out_of_order.push_assistant(vec![call("a"), call("b")]);
        out_of_order.turns.push(Turn::ToolResults(vec![result("b"), result("a")]));
        assert!(!out_of_order.is_consistent());

        let mut skipped = Conversation::default();
        skipped.push_assistant(vec![call("a")]);
        skipped.push_user("Never mind".to_owned());
        assert!(!skipped.is_consistent());

        let mut orphan = Conversation::default();
        orphan.turns.push(Turn::ToolResults(vec![result("a")]));
        assert!(!orphan.is_consistent());
    }
}
