// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: image intake and annotation persistence.

pub mod media;
pub mod persist;
