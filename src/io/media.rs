// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file discovery and first-frame decoding.
//!
//! This module owns the input/output directory convention, the
//! extension-filtered listing of source videos, and the decode of a
//! video's first frame into an RGBA buffer suitable for an egui texture.

use std::fs;
use std::path::{Path, PathBuf};

use opencv::{core, imgproc, prelude::*, videoio};

use super::VideoError;

/// Container extensions accepted as source videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// Subdirectory holding source videos, next to the executable.
pub const INPUT_DIR_NAME: &str = "origin-video";

/// Sibling subdirectory the cropped outputs are written into.
pub const OUTPUT_DIR_NAME: &str = "cropped-video";

/// The directory the input/output folders live in: the executable's
/// directory, falling back to the current directory.
pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn input_dir() -> PathBuf {
    base_dir().join(INPUT_DIR_NAME)
}

pub fn output_dir() -> PathBuf {
    base_dir().join(OUTPUT_DIR_NAME)
}

/// Check whether a path has one of the accepted video extensions.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// List video file names in `dir`, sorted by name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_videos(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| is_video_file(&e.path()))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

/// First frame of a video, decoded to RGBA for display.
#[derive(Debug)]
pub struct FirstFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode the first frame of the video at `path`.
///
/// Fails with [`VideoError::SourceOpen`] when the container cannot be
/// opened or yields no readable frame.
pub fn load_first_frame(path: &Path) -> Result<FirstFrame, VideoError> {
    let mut capture =
        videoio::VideoCapture::from_file(path.to_string_lossy().as_ref(), videoio::CAP_ANY)
            .map_err(|e| VideoError::SourceOpen {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
    if !capture.is_opened()? {
        return Err(VideoError::SourceOpen {
            path: path.to_path_buf(),
            reason: "capture failed to open".into(),
        });
    }

    let mut frame = core::Mat::default();
    let got = capture.read(&mut frame).unwrap_or(false);
    capture.release()?;
    if !got || frame.empty() {
        return Err(VideoError::SourceOpen {
            path: path.to_path_buf(),
            reason: "no readable first frame".into(),
        });
    }

    // OpenCV decodes BGR; egui wants RGBA.
    let mut rgba = core::Mat::default();
    imgproc::cvt_color(&frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;

    Ok(FirstFrame {
        width: rgba.cols() as u32,
        height: rgba.rows() as u32,
        rgba: rgba.data_bytes()?.to_vec(),
    })
}
