// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sections that appear only when the caller has something to say:
//! ambient time/location context and remembered facts about the user.

use std::fmt::Write;

use lore_core::types::{AmbientContext, UserMemory};

/// Renders the ambient block, or `None` when no context was supplied or
/// every field is blank.
pub fn render_ambient(ambient: Option<&AmbientContext>) -> Option<String> {
    let ctx = ambient?;
    let mut out = String::new();

    let location = match (ctx.city.trim(), ctx.country.trim()) {
        ("", "") => None,
        (city, "") => Some(city.to_string()),
        ("", country) => Some(country.to_string()),
        (city, country) => Some(format!("{city}, {country}")),
    };
    if let Some(location) = location {
        let _ = writeln!(out, "Location: {location}");
    }
    if !ctx.local_time.trim().is_empty() {
        let _ = writeln!(out, "Local time: {}", ctx.local_time.trim());
    }
    if !ctx.day_of_week.trim().is_empty() {
        let _ = writeln!(out, "Day: {}", ctx.day_of_week.trim());
    }
    if !ctx.meal_time.trim().is_empty() {
        let _ = writeln!(out, "Meal time: {}", ctx.meal_time.trim());
    }

    (!out.is_empty()).then_some(out)
}

/// Renders up to `max` memories, most important first (ties broken by
/// most recently updated). `None` when the user has no memories.
pub fn render_memories(memories: &[UserMemory], max: usize) -> Option<String> {
    if memories.is_empty() || max == 0 {
        return None;
    }

    let mut ordered: Vec<&UserMemory> = memories.iter().collect();
    ordered.sort_by(|a, b| {
        b.importance
            .cmp(&a.importance)
            .then_with(|| b.last_updated.cmp(&a.last_updated))
    });

    let mut out = String::new();
    for memory in ordered.into_iter().take(max) {
        let _ = writeln!(
            out,
            "- {}: {} ({})",
            memory.key,
            memory.value.trim(),
            memory.memory_type
        );
    }
    Some(out)
}
