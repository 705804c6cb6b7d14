// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformation between the scaled,
//! centered preview of a frame and the frame's own pixel space.

/// Affine transform that places a scaled source frame inside the viewport.
///
/// `scale` is strictly positive; the offsets are integral-valued and
/// center the scaled image inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Compute the transform that fits a `frame_w` x `frame_h` frame inside a
/// viewport, preserving aspect ratio and centering the result.
pub fn fit_transform(
    viewport_w: f64,
    viewport_h: f64,
    frame_w: u32,
    frame_h: u32,
) -> DisplayTransform {
    let scale = (viewport_w / frame_w as f64).min(viewport_h / frame_h as f64);
    let scaled_w = frame_w as f64 * scale;
    let scaled_h = frame_h as f64 * scale;
    DisplayTransform {
        scale,
        offset_x: ((viewport_w - scaled_w) / 2.0).floor(),
        offset_y: ((viewport_h - scaled_h) / 2.0).floor(),
    }
}

/// Convert a display (viewport) point to source-frame pixel coordinates.
///
/// The result is clamped to `[0, frame_w]` x `[0, frame_h]` and truncated,
/// so it is always within frame bounds even when the pointer was dragged
/// far outside the visible image.
pub fn to_source(
    display_x: f64,
    display_y: f64,
    transform: &DisplayTransform,
    frame_w: u32,
    frame_h: u32,
) -> (u32, u32) {
    let sx = (display_x - transform.offset_x) / transform.scale;
    let sy = (display_y - transform.offset_y) / transform.scale;
    (
        sx.clamp(0.0, frame_w as f64) as u32,
        sy.clamp(0.0, frame_h as f64) as u32,
    )
}

/// Convert source-frame pixel coordinates back to display coordinates.
///
/// No clamping; only used to re-project an already-valid region.
pub fn to_display(source_x: u32, source_y: u32, transform: &DisplayTransform) -> (f64, f64) {
    (
        source_x as f64 * transform.scale + transform.offset_x,
        source_y as f64 * transform.scale + transform.offset_y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_contains_and_centers() {
        let cases = [
            (800.0, 600.0, 1920, 1080),
            (600.0, 800.0, 1920, 1080),
            (1000.0, 1000.0, 200, 150),
            (123.0, 457.0, 99, 301),
        ];
        for (vw, vh, fw, fh) in cases {
            let t = fit_transform(vw, vh, fw, fh);
            let scaled_w = fw as f64 * t.scale;
            let scaled_h = fh as f64 * t.scale;

            assert!(t.scale > 0.0);
            assert!(t.offset_x >= 0.0 && t.offset_y >= 0.0);
            assert!(t.offset_x + scaled_w <= vw + 1e-9);
            assert!(t.offset_y + scaled_h <= vh + 1e-9);
            // Integer offsets keep the image within 1px of exact centering.
            assert!((t.offset_x - (vw - scaled_w) / 2.0).abs() <= 1.0);
            assert!((t.offset_y - (vh - scaled_h) / 2.0).abs() <= 1.0);
        }
    }

    #[test]
    fn test_scale_is_min_of_axis_ratios() {
        let t = fit_transform(800.0, 600.0, 1920, 1080);
        assert!((t.scale - 600.0 / 1080.0).abs() < 1e-9);

        let t = fit_transform(400.0, 600.0, 200, 150);
        assert!((t.scale - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_source_display_roundtrip() {
        let t = fit_transform(800.0, 600.0, 1920, 1080);
        for (x, y) in [(0, 0), (960, 540), (1919, 1079), (13, 777)] {
            let (dx, dy) = to_display(x, y, &t);
            let (rx, ry) = to_source(dx, dy, &t, 1920, 1080);
            assert!((rx as i64 - x as i64).abs() <= 1, "x: {} -> {}", x, rx);
            assert!((ry as i64 - y as i64).abs() <= 1, "y: {} -> {}", y, ry);
        }
    }

    #[test]
    fn test_to_source_clamps_outside_points() {
        let t = fit_transform(800.0, 600.0, 200, 150);

        let (x, y) = to_source(-5000.0, -5000.0, &t, 200, 150);
        assert_eq!((x, y), (0, 0));

        let (x, y) = to_source(5000.0, 5000.0, &t, 200, 150);
        assert_eq!((x, y), (200, 150));
    }
}
