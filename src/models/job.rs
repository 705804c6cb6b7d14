// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export job and event types.
//!
//! A [`CropJob`] is an immutable snapshot taken when the operator triggers
//! an export; the worker thread owns it outright, so selection changes made
//! while the job runs cannot affect it. Results flow back to the foreground
//! only as [`ExportEvent`]s over a channel.

use std::path::PathBuf;

use crate::models::region::Region;

/// Fixed output frame rate.
pub const TARGET_FPS: u32 = 10;

/// An immutable export request, consumed exactly once by the pipeline.
#[derive(Debug, Clone)]
pub struct CropJob {
    /// Path of the source video.
    pub source: PathBuf,
    /// Crop rectangle in source coordinates (not yet even-normalized).
    pub region: Region,
    /// Output frame rate the writer is configured with.
    pub target_fps: u32,
    /// Directory the output file is written into, created if absent.
    pub output_dir: PathBuf,
}

impl CropJob {
    pub fn new(source: PathBuf, region: Region, output_dir: PathBuf) -> Self {
        Self {
            source,
            region,
            target_fps: TARGET_FPS,
            output_dir,
        }
    }
}

/// Status messages posted by the export worker.
#[derive(Debug, Clone)]
pub enum ExportEvent {
    /// Periodic snapshot; `percent` is `None` when the container's
    /// reported total frame count is unreliable.
    Progress {
        percent: Option<f64>,
        frames_written: u64,
    },
    /// The job finished; the output file is complete.
    Done {
        output: PathBuf,
        frames_written: u64,
    },
    /// The job aborted with a hard error.
    Failed(String),
}
