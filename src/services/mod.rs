// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod analyzer;
pub mod browser_audit;
pub mod fetcher;
pub mod link_checker;
pub mod logging;
pub mod orchestrator;
pub mod progress;
pub mod readability;
pub mod scoring;
pub mod text_metrics;
