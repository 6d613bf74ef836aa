// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history window.

use std::fmt::Write;

use lore_core::types::{ConversationTurn, Role};

/// The last `max_turns` turns, oldest first.
pub fn window(history: &[ConversationTurn], max_turns: usize) -> &[ConversationTurn] {
    let start = history.len().saturating_sub(max_turns);
    &history[start..]
}

/// Renders the last `max_turns` turns as `User:`/`Assistant:` lines.
///
/// Returns `None` when there is no history, so the section is omitted.
pub fn render_history(history: &[ConversationTurn], max_turns: usize) -> Option<String> {
    let turns = window(history, max_turns);
    if turns.is_empty() {
        return None;
    }

    let mut out = String::new();
    for turn in turns {
        let speaker = match turn.role {
            Role::User => "User",
            Role::Bot => "Assistant",
        };
        let _ = writeln!(out, "{speaker}: {}", turn.content.trim());
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_last_turns() {
        let history: Vec<ConversationTurn> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationTurn::user(format!("u{i}"))
                } else {
                    ConversationTurn::bot(format!("b{i}"))
                }
            })
            .collect();

        let text = render_history(&history, 6).expect("history present");
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("User: u4\n"));
        assert!(text.ends_with("Assistant: b9\n"));
        assert!(!text.contains("u2"));
    }

    #[test]
    fn empty_history_is_omitted() {
        assert!(render_history(&[], 6).is_none());
    }

    #[test]
    fn short_history_is_kept_whole() {
        let history = vec![ConversationTurn::user("hi")];
        assert_eq!(window(&history, 4).len(), 1);
    }
}
