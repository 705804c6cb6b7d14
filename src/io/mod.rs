// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video I/O: source probing, directory conventions, and the export pipeline.

pub mod export;
pub mod media;

use std::path::PathBuf;
use thiserror::Error;

/// Hard failures surfaced by the video layer.
///
/// Mid-stream read failures are not represented here: the capture API
/// cannot distinguish them from end of stream, so the pipeline treats
/// a failed read as normal completion.
#[derive(Debug, Error)]
pub enum VideoError {
    /// The source cannot be opened or yields no first frame.
    #[error("cannot open source video {}: {reason}", path.display())]
    SourceOpen { path: PathBuf, reason: String },

    /// The destination writer cannot be initialized.
    #[error("cannot create output video {}: {reason}", path.display())]
    SinkOpen { path: PathBuf, reason: String },

    /// Any other failure reported by the OpenCV backend.
    #[error(transparent)]
    Backend(#[from] opencv::Error),
}
