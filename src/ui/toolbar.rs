// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: video picker, selection controls, and the info line.

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    VideoPicked(usize),
    ClearSelection,
    StartExport,
}

/// Display the toolbar. `busy` means an export is running: every control
/// that could start or disturb a job is disabled until it finishes.
pub fn show(
    ui: &mut egui::Ui,
    videos: &[String],
    selected: Option<usize>,
    info: &str,
    export_enabled: bool,
    busy: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Video:");

        let selected_text = selected
            .and_then(|i| videos.get(i))
            .map(String::as_str)
            .unwrap_or("(choose a file)");

        ui.add_enabled_ui(!busy, |ui| {
            egui::ComboBox::from_id_source("video_picker")
                .width(260.0)
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (i, name) in videos.iter().enumerate() {
                        if ui.selectable_label(selected == Some(i), name).clicked() {
                            action = ToolbarAction::VideoPicked(i);
                        }
                    }
                });
        });

        ui.separator();

        if ui
            .add_enabled(!busy, egui::Button::new("Clear Selection"))
            .clicked()
        {
            action = ToolbarAction::ClearSelection;
        }

        if ui
            .add_enabled(export_enabled && !busy, egui::Button::new("Crop & Export"))
            .clicked()
        {
            action = ToolbarAction::StartExport;
        }

        ui.separator();

        ui.label(egui::RichText::new(info).italics().weak());
    });

    action
}
