// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input sanitization applied before text leaves the process.

/// Maximum characters submitted for embedding.
pub const MAX_EMBED_CHARS: usize = 2000;

/// Trims, strips angle brackets, and truncates to [`MAX_EMBED_CHARS`]
/// characters (never splitting a UTF-8 code point).
pub fn sanitize_input(text: &str) -> String {
    let stripped: String = text.trim().chars().filter(|c| *c != '<' && *c != '>').collect();
    let truncated: String = stripped.chars().take(MAX_EMBED_CHARS).collect();
    truncated.trim().to_string()
}
