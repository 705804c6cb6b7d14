// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The foreground (egui) thread owns all interactive state. Background
//! work comes in two flavors, both reported back over mpsc channels the
//! update loop polls: first-frame loading when a video is picked, and at
//! most one export job at a time.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};

use crate::io::{export, media};
use crate::models::job::{CropJob, ExportEvent, TARGET_FPS};
use crate::models::region::{Selection, MIN_SELECTION_PX};
use crate::ui::{canvas, toolbar};

/// Main application state.
pub struct CropperApp {
    /// Fixed input directory next to the executable
    input_dir: PathBuf,

    /// Fixed output directory, created on demand by the pipeline
    output_dir: PathBuf,

    /// Video file names found in the input directory, sorted
    videos: Vec<String>,

    /// Combobox index of the picked video
    selected_video: Option<usize>,

    /// Full path of the currently loaded source video
    source_path: Option<PathBuf>,

    /// First frame texture for display
    frame_texture: Option<egui::TextureHandle>,

    /// Source frame dimensions (width, height)
    frame_size: Option<(u32, u32)>,

    /// Selection rectangle lifecycle
    selection: Selection,

    /// Receiver for background first-frame loading
    frame_loader: Option<Receiver<Result<media::FirstFrame, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Event channel of the in-flight export job, if any
    export_events: Option<Receiver<ExportEvent>>,

    /// Last known export progress fraction; None while indeterminate
    progress: Option<f32>,

    /// Info line in the toolbar (resolution / selection feedback)
    info: String,

    /// Status line next to the progress bar
    status: String,
}

impl Default for CropperApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CropperApp {
    /// Create a new VidCrop application instance, scanning the input
    /// directory once at startup.
    pub fn new() -> Self {
        let input_dir = media::input_dir();
        let videos = media::list_videos(&input_dir);
        log::info!(
            "found {} video(s) in {}",
            videos.len(),
            input_dir.display()
        );

        Self {
            input_dir,
            output_dir: media::output_dir(),
            videos,
            selected_video: None,
            source_path: None,
            frame_texture: None,
            frame_size: None,
            selection: Selection::Empty,
            frame_loader: None,
            loading_message: None,
            export_events: None,
            progress: None,
            info: "Pick a video file to begin".to_owned(),
            status: "Ready".to_owned(),
        }
    }

    fn exporting(&self) -> bool {
        self.export_events.is_some()
    }

    /// Load the first frame of a video on a background thread. Any
    /// existing selection is invalidated immediately.
    fn load_video(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.loading_message = Some(format!("Loading {name}..."));
        self.source_path = Some(path.clone());
        self.selection.reset();

        let (sender, receiver) = channel();
        self.frame_loader = Some(receiver);

        std::thread::spawn(move || {
            let result = media::load_first_frame(&path).map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    /// Snapshot the current selection into an immutable job and hand it
    /// to the worker. Later selection changes cannot affect the job.
    fn start_export(&mut self) {
        let (Some(source), Some(region)) = (self.source_path.clone(), self.selection.region())
        else {
            return;
        };

        let job = CropJob::new(source, region, self.output_dir.clone());
        log::info!(
            "export triggered: {} region ({}, {})-({}, {})",
            job.source.display(),
            region.x1,
            region.y1,
            region.x2,
            region.y2
        );

        self.progress = Some(0.0);
        self.status = "Exporting...".to_owned();
        self.export_events = Some(export::spawn(job));
    }

    /// Poll the first-frame loader channel.
    fn poll_frame_loader(&mut self, ctx: &egui::Context) {
        if let Some(ref receiver) = self.frame_loader {
            if let Ok(result) = receiver.try_recv() {
                self.frame_loader = None;
                self.loading_message = None;

                match result {
                    Ok(frame) => {
                        let size = [frame.width as usize, frame.height as usize];
                        let color_image =
                            egui::ColorImage::from_rgba_unmultiplied(size, &frame.rgba);
                        let texture = ctx.load_texture(
                            "first_frame",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        );

                        self.frame_texture = Some(texture);
                        self.frame_size = Some((frame.width, frame.height));
                        self.info = format!(
                            "Source resolution: {} x {}  |  drag on the frame to select the crop region",
                            frame.width, frame.height
                        );
                        log::info!("first frame loaded: {}x{}", frame.width, frame.height);
                    }
                    Err(e) => {
                        self.frame_texture = None;
                        self.frame_size = None;
                        self.source_path = None;
                        self.info = format!("Failed to load video: {e}");
                        log::error!("failed to load video: {e}");
                    }
                }
            }
        }
    }

    /// Drain pending export events; on a terminal event the channel is
    /// dropped, which re-enables the export controls.
    fn poll_export_events(&mut self) {
        let mut finished = false;

        if let Some(ref receiver) = self.export_events {
            loop {
                match receiver.try_recv() {
                    Ok(ExportEvent::Progress {
                        percent,
                        frames_written,
                    }) => {
                        self.progress = percent.map(|p| (p / 100.0) as f32);
                        self.status = match percent {
                            Some(p) => {
                                format!("Exporting... {p:.1}%  |  {frames_written} frames written")
                            }
                            None => format!("Exporting... {frames_written} frames written"),
                        };
                    }
                    Ok(ExportEvent::Done {
                        output,
                        frames_written,
                    }) => {
                        self.progress = Some(1.0);
                        self.status = format!(
                            "Done: {frames_written} frames -> {} ({TARGET_FPS} fps, audio removed)",
                            output.display()
                        );
                        finished = true;
                    }
                    Ok(ExportEvent::Failed(message)) => {
                        self.progress = None;
                        self.status = format!("Export failed: {message}");
                        finished = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    // Worker gone without a terminal event (panic); recover
                    // the controls anyway.
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }

        if finished {
            self.export_events = None;
        }
    }

    fn handle_toolbar_action(&mut self, action: toolbar::ToolbarAction) {
        match action {
            toolbar::ToolbarAction::VideoPicked(index) => {
                if let Some(name) = self.videos.get(index) {
                    let path = self.input_dir.join(name);
                    self.selected_video = Some(index);
                    self.load_video(path);
                }
            }
            toolbar::ToolbarAction::ClearSelection => {
                self.selection.reset();
                self.info = match self.frame_size {
                    Some((w, h)) => format!(
                        "Source resolution: {w} x {h}  |  drag on the frame to select the crop region"
                    ),
                    None => "Pick a video file to begin".to_owned(),
                };
            }
            toolbar::ToolbarAction::StartExport => self.start_export(),
            toolbar::ToolbarAction::None => {}
        }
    }

    fn handle_canvas_action(&mut self, action: canvas::CanvasAction) {
        match action {
            canvas::CanvasAction::DragStarted { x, y } => {
                self.selection.begin_drag(x, y);
            }
            canvas::CanvasAction::DragFinished { start, end } => {
                self.selection.finish_drag(start, end);
                match self.selection {
                    Selection::Valid(region) => {
                        self.info = format!(
                            "Selection: ({}, {}) - ({}, {})  |  {} x {} px",
                            region.x1,
                            region.y1,
                            region.x2,
                            region.y2,
                            region.width(),
                            region.height()
                        );
                        log::info!(
                            "selection confirmed: {}x{} at ({}, {})",
                            region.width(),
                            region.height(),
                            region.x1,
                            region.y1
                        );
                    }
                    Selection::Rejected => {
                        self.info = format!(
                            "Selection too small, redraw at least {MIN_SELECTION_PX} x {MIN_SELECTION_PX} px"
                        );
                    }
                    _ => {}
                }
            }
            canvas::CanvasAction::None => {}
        }
    }
}

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_frame_loader(ctx);
        self.poll_export_events();

        // Keep repainting while background work is in flight so channel
        // polling does not stall waiting for input events.
        if self.loading_message.is_some() || self.exporting() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add_enabled(!self.exporting(), egui::Button::new("Open Video..."))
                        .clicked()
                    {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Videos", media::VIDEO_EXTENSIONS)
                            .pick_file()
                        {
                            self.selected_video = None;
                            self.load_video(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let export_enabled = self.selection.region().is_some();
        let busy = self.exporting();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &self.videos,
                    self.selected_video,
                    &self.info,
                    export_enabled,
                    busy,
                )
            })
            .inner;
        self.handle_toolbar_action(toolbar_action);

        // Bottom status bar with progress
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let bar = match self.progress {
                    Some(fraction) => egui::ProgressBar::new(fraction.clamp(0.0, 1.0)),
                    None if self.exporting() => egui::ProgressBar::new(0.0).animate(true),
                    None => egui::ProgressBar::new(0.0),
                };
                ui.add(bar.desired_width(220.0));
                ui.label(&self.status);
            });
        });

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    canvas::show(ui, &self.frame_texture, self.frame_size, &self.selection)
                }
            })
            .inner;
        self.handle_canvas_action(canvas_action);
    }
}
