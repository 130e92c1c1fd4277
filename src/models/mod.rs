// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod audit;
pub mod progress;
pub mod settings;
pub mod version;
