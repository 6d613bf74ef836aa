// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod knowledge;
pub mod memories;
pub mod unanswered;
