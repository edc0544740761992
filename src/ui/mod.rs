// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the RadView application.

pub mod canvas;
pub mod panel;
pub mod toast;
pub mod toolbar;
