// Copyright 2025-2026 Neil Henderson

mod invalid_programs;
mod invariants;
mod support;
mod warnings;
