// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The cropping pipeline: frame sampling, cropping, and re-encoding.
//!
//! [`spawn`] runs one job on a dedicated worker thread and reports back
//! through the returned channel; [`run`] is the synchronous core the
//! worker (and the tests) drive directly.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use opencv::{core, prelude::*, videoio};

use super::VideoError;
use crate::models::job::{CropJob, ExportEvent};

/// Fourcc of the fixed output codec.
const OUTPUT_FOURCC: [char; 4] = ['m', 'p', '4', 'v'];

/// Suffix appended to the source base name for the output file.
const OUTPUT_SUFFIX: &str = "_cropped";

/// A progress event is emitted every this many source frames.
const PROGRESS_CADENCE: u64 = 30;

/// Decides which source frame indices are kept when resampling to the
/// target frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    interval: u64,
}

impl FrameSampler {
    /// Interval is `round(source_fps / target_fps)` with round half away
    /// from zero, floored at 1. A bogus reported fps degrades to keeping
    /// every frame.
    pub fn new(source_fps: f64, target_fps: u32) -> Self {
        let interval = (source_fps / target_fps as f64).round().max(1.0) as u64;
        Self { interval }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Whether the zero-based source frame index is kept.
    pub fn keeps(&self, index: u64) -> bool {
        index % self.interval == 0
    }
}

/// Deterministic output path for a source video: `{base}_cropped.mp4`
/// inside `output_dir`.
pub fn output_path(source: &Path, output_dir: &Path) -> PathBuf {
    let base = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    output_dir.join(format!("{}{}.mp4", base, OUTPUT_SUFFIX))
}

/// Run one export job on a background worker thread.
///
/// At most one job is in flight at a time; the caller enforces this by
/// keeping its trigger disabled while the returned channel is live. The
/// worker never blocks on the foreground and cannot be cancelled.
pub fn spawn(job: CropJob) -> Receiver<ExportEvent> {
    let (sender, receiver) = channel();
    thread::spawn(move || {
        log::info!("export started: {}", job.source.display());
        match run(&job, &sender) {
            Ok((output, frames_written)) => {
                log::info!("export done: {} frames -> {}", frames_written, output.display());
                let _ = sender.send(ExportEvent::Done {
                    output,
                    frames_written,
                });
            }
            Err(e) => {
                log::error!("export failed: {e}");
                let _ = sender.send(ExportEvent::Failed(e.to_string()));
            }
        }
    });
    receiver
}

/// Synchronous pipeline core: open, sample, crop, encode.
///
/// Progress events go out on `events`; the terminal outcome is the
/// return value. A failed mid-stream read is indistinguishable from end
/// of stream at this API and ends the loop normally.
pub fn run(job: &CropJob, events: &Sender<ExportEvent>) -> Result<(PathBuf, u64), VideoError> {
    let mut capture =
        videoio::VideoCapture::from_file(job.source.to_string_lossy().as_ref(), videoio::CAP_ANY)
            .map_err(|e| VideoError::SourceOpen {
                path: job.source.clone(),
                reason: e.to_string(),
            })?;
    if !capture.is_opened()? {
        return Err(VideoError::SourceOpen {
            path: job.source.clone(),
            reason: "capture failed to open".into(),
        });
    }

    let total_frames = capture.get(videoio::CAP_PROP_FRAME_COUNT)? as i64;
    let source_fps = capture.get(videoio::CAP_PROP_FPS)?;
    let sampler = FrameSampler::new(source_fps, job.target_fps);

    // A source that opens but yields no frame is an open failure; checked
    // before the output side so no file is created for it.
    let mut frame = core::Mat::default();
    if !capture.read(&mut frame).unwrap_or(false) || frame.empty() {
        capture.release()?;
        return Err(VideoError::SourceOpen {
            path: job.source.clone(),
            reason: "no readable first frame".into(),
        });
    }

    // The encoder requires even dimensions.
    let region = job.region.normalized_even();
    let crop_w = region.width() as i32;
    let crop_h = region.height() as i32;

    fs::create_dir_all(&job.output_dir).map_err(|e| VideoError::SinkOpen {
        path: job.output_dir.clone(),
        reason: e.to_string(),
    })?;
    let output = output_path(&job.source, &job.output_dir);

    let fourcc = videoio::VideoWriter::fourcc(
        OUTPUT_FOURCC[0],
        OUTPUT_FOURCC[1],
        OUTPUT_FOURCC[2],
        OUTPUT_FOURCC[3],
    )?;
    let mut writer = videoio::VideoWriter::new(
        output.to_string_lossy().as_ref(),
        fourcc,
        job.target_fps as f64,
        core::Size::new(crop_w, crop_h),
        true,
    )
    .map_err(|e| VideoError::SinkOpen {
        path: output.clone(),
        reason: e.to_string(),
    })?;
    if !writer.is_opened()? {
        capture.release()?;
        return Err(VideoError::SinkOpen {
            path: output,
            reason: "encoder unavailable or path not writable".into(),
        });
    }

    log::info!(
        "cropping {} ({:.1} fps, {} frames reported) to {}x{} at {} fps, interval {}",
        job.source.display(),
        source_fps,
        total_frames,
        crop_w,
        crop_h,
        job.target_fps,
        sampler.interval()
    );

    let roi = core::Rect::new(region.x1 as i32, region.y1 as i32, crop_w, crop_h);
    let mut frame_idx: u64 = 0;
    let mut frames_written: u64 = 0;

    // The first frame is already in hand; each pass processes the current
    // frame, then reads the next.
    loop {
        if sampler.keeps(frame_idx) {
            let cropped = core::Mat::roi(&frame, roi)?;
            writer.write(&cropped)?;
            frames_written += 1;
        }
        frame_idx += 1;

        if frame_idx % PROGRESS_CADENCE == 0 {
            let percent =
                (total_frames > 0).then(|| 100.0 * frame_idx as f64 / total_frames as f64);
            let _ = events.send(ExportEvent::Progress {
                percent,
                frames_written,
            });
        }

        // A read failure is treated the same as end of stream.
        match capture.read(&mut frame) {
            Ok(true) => {}
            _ => break,
        }
    }

    capture.release()?;
    writer.release()?;

    Ok((output, frames_written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::Region;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("vidcrop-export-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_test_video(path: &Path, frames: i32, fps: f64, w: i32, h: i32) {
        let fourcc = videoio::VideoWriter::fourcc('m', 'p', '4', 'v').unwrap();
        let mut writer = videoio::VideoWriter::new(
            path.to_string_lossy().as_ref(),
            fourcc,
            fps,
            core::Size::new(w, h),
            true,
        )
        .unwrap();
        assert!(writer.is_opened().unwrap());
        for i in 0..frames {
            let frame = core::Mat::new_rows_cols_with_default(
                h,
                w,
                core::CV_8UC3,
                core::Scalar::all((i % 256) as f64),
            )
            .unwrap();
            writer.write(&frame).unwrap();
        }
        writer.release().unwrap();
    }

    #[test]
    fn test_sampler_intervals() {
        assert_eq!(FrameSampler::new(30.0, 10).interval(), 3);
        // Round half away from zero: 2.5 rounds up.
        assert_eq!(FrameSampler::new(25.0, 10).interval(), 3);
        assert_eq!(FrameSampler::new(29.97, 10).interval(), 3);
        assert_eq!(FrameSampler::new(60.0, 10).interval(), 6);
        assert_eq!(FrameSampler::new(10.0, 10).interval(), 1);
    }

    #[test]
    fn test_sampler_interval_never_below_one() {
        assert_eq!(FrameSampler::new(5.0, 10).interval(), 1);
        assert_eq!(FrameSampler::new(0.0, 10).interval(), 1);
        assert_eq!(FrameSampler::new(-30.0, 10).interval(), 1);
    }

    #[test]
    fn test_sampler_keeps_evenly_spaced_subsequence() {
        let sampler = FrameSampler::new(30.0, 10);
        let kept: Vec<u64> = (0..90).filter(|&i| sampler.keeps(i)).collect();
        assert_eq!(kept.len(), 30);
        assert_eq!(kept[0], 0);
        assert_eq!(kept[1], 3);
        assert_eq!(*kept.last().unwrap(), 87);
    }

    #[test]
    fn test_output_path_naming() {
        let out = output_path(Path::new("/videos/traffic light.mkv"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/traffic light_cropped.mp4"));
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let dir = scratch_dir("e2e");
        let source = dir.join("clip.mp4");
        write_test_video(&source, 90, 30.0, 200, 150);

        // 99x99 selection, normalized to 98x98.
        let region = Region { x1: 10, y1: 10, x2: 109, y2: 109 };
        let job = CropJob::new(source, region, dir.join("out"));
        let (sender, receiver) = channel();

        let (output, frames_written) = run(&job, &sender).unwrap();
        assert_eq!(frames_written, 30);
        assert_eq!(output.file_name().unwrap(), "clip_cropped.mp4");
        assert!(output.exists());

        // 90 source frames on a 30-frame cadence: progress was reported.
        let events: Vec<ExportEvent> = receiver.try_iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, ExportEvent::Progress { .. })));

        let check = videoio::VideoCapture::from_file(
            output.to_string_lossy().as_ref(),
            videoio::CAP_ANY,
        )
        .unwrap();
        assert_eq!(check.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap() as i32, 98);
        assert_eq!(check.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap() as i32, 98);
        assert!((check.get(videoio::CAP_PROP_FPS).unwrap() - 10.0).abs() < 0.5);
        assert_eq!(check.get(videoio::CAP_PROP_FRAME_COUNT).unwrap() as i64, 30);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rerun_overwrites_existing_output() {
        let dir = scratch_dir("overwrite");
        let source = dir.join("clip.mp4");
        write_test_video(&source, 30, 30.0, 100, 100);

        let region = Region { x1: 0, y1: 0, x2: 50, y2: 50 };
        let job = CropJob::new(source, region, dir.join("out"));

        let (sender, _receiver) = channel();
        let (first, _) = run(&job, &sender).unwrap();
        let (sender, _receiver) = channel();
        let (second, n) = run(&job, &sender).unwrap();

        assert_eq!(first, second);
        assert_eq!(n, 10);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_zero_frame_source_is_source_open_error() {
        let dir = scratch_dir("zeroframe");
        let source = dir.join("empty.mp4");
        // Container header only, no frames: the capture may open it but
        // cannot read a first frame.
        write_test_video(&source, 0, 30.0, 100, 100);

        let region = Region { x1: 0, y1: 0, x2: 50, y2: 50 };
        let job = CropJob::new(source, region, dir.join("out"));
        let (sender, _receiver) = channel();

        let err = run(&job, &sender).unwrap_err();
        assert!(matches!(err, VideoError::SourceOpen { .. }));
        // The pipeline halted before creating any output.
        assert!(!dir.join("out").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unwritable_output_dir_is_sink_open_error() {
        let dir = scratch_dir("sink");
        let source = dir.join("clip.mp4");
        write_test_video(&source, 30, 30.0, 100, 100);

        // A regular file sits where the output directory's parent should
        // be, so the directory cannot be created.
        let blocker = dir.join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let region = Region { x1: 0, y1: 0, x2: 50, y2: 50 };
        let job = CropJob::new(source, region, blocker.join("out"));
        let (sender, _receiver) = channel();

        let err = run(&job, &sender).unwrap_err();
        assert!(matches!(err, VideoError::SinkOpen { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_source_is_source_open_error() {
        let dir = scratch_dir("missing");
        let region = Region { x1: 0, y1: 0, x2: 20, y2: 20 };
        let job = CropJob::new(dir.join("nope.mp4"), region, dir.join("out"));
        let (sender, _receiver) = channel();

        let err = run(&job, &sender).unwrap_err();
        assert!(matches!(err, VideoError::SourceOpen { .. }));
        // The pipeline halted before touching the output side.
        assert!(!dir.join("out").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
