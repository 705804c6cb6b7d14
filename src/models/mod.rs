// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Domain state: the selection rectangle and the export job snapshot.

pub mod job;
pub mod region;
