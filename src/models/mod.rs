// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Core state: annotations, view transforms and the session aggregate.

pub mod annotation;
pub mod session;
pub mod store;
pub mod viewport;
