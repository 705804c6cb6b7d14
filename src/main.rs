// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! VidCrop - interactive region-of-interest video cropper.
//!
//! A desktop application that shows the first frame of a video, lets the
//! operator drag a crop rectangle on it, and exports the cropped region
//! as a 10 fps MP4 with the audio dropped.

mod app;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::CropperApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("VidCrop - Region Cropper"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "VidCrop",
        options,
        Box::new(|_cc| Ok(Box::new(CropperApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
