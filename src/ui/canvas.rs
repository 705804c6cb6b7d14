// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview canvas for the first frame and the drag selection.
//!
//! The canvas fits the frame texture into the available area, captures
//! pointer drags, and draws the selection rectangle. Display-to-source
//! conversion happens here because only the canvas knows this frame's
//! transform; the confirmed rectangle is re-projected from source
//! coordinates every frame rather than stored in display space.

use crate::models::region::Selection;
use crate::util::geometry;

/// Result of canvas interaction, in the coordinate space the app needs:
/// drag starts are display points, finished drags are source points.
pub enum CanvasAction {
    None,
    DragStarted { x: f64, y: f64 },
    DragFinished { start: (u32, u32), end: (u32, u32) },
}

/// Display the preview canvas and handle drag interactions.
pub fn show(
    ui: &mut egui::Ui,
    frame_texture: &Option<egui::TextureHandle>,
    frame_size: Option<(u32, u32)>,
    selection: &Selection,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        let (Some(texture), Some((frame_w, frame_h))) = (frame_texture, frame_size) else {
            show_welcome(ui, canvas_rect);
            return;
        };

        let transform = geometry::fit_transform(
            canvas_rect.width() as f64,
            canvas_rect.height() as f64,
            frame_w,
            frame_h,
        );
        let image_rect = egui::Rect::from_min_size(
            canvas_rect.min
                + egui::vec2(transform.offset_x as f32, transform.offset_y as f32),
            egui::vec2(
                (frame_w as f64 * transform.scale) as f32,
                (frame_h as f64 * transform.scale) as f32,
            ),
        );

        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Pointer positions are translated to canvas-local display coords.
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                action = CanvasAction::DragStarted {
                    x: (pos.x - canvas_rect.min.x) as f64,
                    y: (pos.y - canvas_rect.min.y) as f64,
                };
            }
        }

        if response.drag_stopped() {
            if let (Selection::Pending { anchor_x, anchor_y }, Some(pos)) =
                (selection, response.interact_pointer_pos())
            {
                let start =
                    geometry::to_source(*anchor_x, *anchor_y, &transform, frame_w, frame_h);
                let end = geometry::to_source(
                    (pos.x - canvas_rect.min.x) as f64,
                    (pos.y - canvas_rect.min.y) as f64,
                    &transform,
                    frame_w,
                    frame_h,
                );
                action = CanvasAction::DragFinished { start, end };
            }
        }

        match selection {
            // Purely visual preview between the anchor and the pointer.
            Selection::Pending { anchor_x, anchor_y } => {
                if let Some(pos) = response.interact_pointer_pos() {
                    let anchor = canvas_rect.min + egui::vec2(*anchor_x as f32, *anchor_y as f32);
                    draw_selection_rect(&painter, egui::Rect::from_two_pos(anchor, pos));
                }
            }
            // The confirmed rectangle is a derived view of the source-space
            // region under this frame's transform.
            Selection::Valid(region) => {
                let (x1, y1) = geometry::to_display(region.x1, region.y1, &transform);
                let (x2, y2) = geometry::to_display(region.x2, region.y2, &transform);
                let rect = egui::Rect::from_min_max(
                    canvas_rect.min + egui::vec2(x1 as f32, y1 as f32),
                    canvas_rect.min + egui::vec2(x2 as f32, y2 as f32),
                );
                draw_selection_rect(&painter, rect);
            }
            Selection::Empty | Selection::Rejected => {}
        }
    });

    action
}

fn draw_selection_rect(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(2.0, egui::Color32::from_rgb(0, 255, 0)),
    );
}

/// Welcome message shown before a video is loaded.
fn show_welcome(ui: &mut egui::Ui, canvas_rect: egui::Rect) {
    let mut content_ui = ui.child_ui(canvas_rect, egui::Layout::top_down(egui::Align::Center), None);
    content_ui.add_space(canvas_rect.height() / 3.0);
    content_ui.heading(
        egui::RichText::new("VIDCROP")
            .size(32.0)
            .color(egui::Color32::from_gray(200)),
    );
    content_ui.label(
        egui::RichText::new("Interactive region-of-interest video cropper")
            .size(14.0)
            .color(egui::Color32::from_gray(150)),
    );
    content_ui.add_space(20.0);
    content_ui.label(
        egui::RichText::new("Pick a video from the toolbar to begin")
            .color(egui::Color32::from_gray(180)),
    );
}
