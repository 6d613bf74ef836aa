// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders ranked knowledge entries into prompt text.

use std::fmt::Write;

use lore_core::types::{EntryKind, ScoredEntry};

/// Note attached to every image entry so the model refers to the image
/// instead of trying to reproduce it.
pub const IMAGE_NOTE: &str =
    "Note: This is an image. It will be displayed to the user next to your reply, so refer to it naturally.";

/// Renders entries in rank order, one block per entry separated by blank lines.
pub fn render_entries(entries: &[ScoredEntry]) -> String {
    let mut out = String::new();
    for (i, scored) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match &scored.entry.kind {
            EntryKind::Qa { question, answer } => {
                let _ = writeln!(out, "Q: {}", question.trim());
                let _ = writeln!(out, "A: {}", answer.trim());
            }
            EntryKind::Context { block } => {
                let _ = writeln!(out, "Information: {}", block.trim());
            }
            EntryKind::Image {
                description,
                alt_text,
                ..
            } => {
                if alt_text.trim().is_empty() {
                    let _ = writeln!(out, "Image: {}", description.trim());
                } else {
                    let _ = writeln!(out, "Image: {} ({})", description.trim(), alt_text.trim());
                }
                let _ = writeln!(out, "{IMAGE_NOTE}");
            }
        }
    }
    out
}
