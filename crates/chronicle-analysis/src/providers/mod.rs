// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Concrete analysis providers

pub mod offline;
pub mod openai;

pub use offline::OfflineProvider;
pub use openai::OpenAiProvider;
