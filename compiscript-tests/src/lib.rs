// Copyright 2025-2026 Neil Henderson
//
//! This crate exists to host the Compiscript integration tests; see `tests/it`.
