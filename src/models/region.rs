// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Selection region data structures.
//!
//! This module defines the crop rectangle in source-frame coordinates and
//! the lifecycle of an in-progress pointer selection.

/// Minimum selection size in source pixels, per axis.
pub const MIN_SELECTION_PX: u32 = 10;

/// An axis-aligned rectangle in source-frame pixel coordinates,
/// with `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Region {
    /// Build a region from two drag endpoints, ordering the corners so
    /// that `x1 < x2` and `y1 < y2`. Returns `None` if either dimension
    /// is below [`MIN_SELECTION_PX`].
    pub fn from_drag(a: (u32, u32), b: (u32, u32)) -> Option<Self> {
        let region = Self {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        };
        if region.width() < MIN_SELECTION_PX || region.height() < MIN_SELECTION_PX {
            None
        } else {
            Some(region)
        }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Shrink the region so both dimensions are even, as the video
    /// encoder requires. Decrements `x2`/`y2` only, so the result stays
    /// within frame bounds and never grows.
    pub fn normalized_even(mut self) -> Self {
        if self.width() % 2 != 0 {
            self.x2 -= 1;
        }
        if self.height() % 2 != 0 {
            self.y2 -= 1;
        }
        self
    }
}

/// Lifecycle of the pointer selection.
///
/// The drag anchor is kept in display coordinates: conversion to source
/// coordinates happens once, at release, so a transform change mid-drag
/// cannot compound rounding error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// No drag in progress, no confirmed rectangle.
    Empty,
    /// A drag is in progress; the anchor is in display coordinates.
    Pending { anchor_x: f64, anchor_y: f64 },
    /// A confirmed, exportable rectangle.
    Valid(Region),
    /// The last drag was too small; export stays disabled.
    Rejected,
}

impl Selection {
    /// Drag started: record the anchor, discarding any prior rectangle.
    pub fn begin_drag(&mut self, anchor_x: f64, anchor_y: f64) {
        *self = Selection::Pending { anchor_x, anchor_y };
    }

    /// Drag released: both endpoints already mapped to source coordinates.
    /// Transitions to `Valid` or `Rejected` depending on the result size.
    pub fn finish_drag(&mut self, a: (u32, u32), b: (u32, u32)) {
        *self = match Region::from_drag(a, b) {
            Some(region) => Selection::Valid(region),
            None => Selection::Rejected,
        };
    }

    /// Explicit clear, or a new video was loaded.
    pub fn reset(&mut self) {
        *self = Selection::Empty;
    }

    /// The confirmed rectangle, if any.
    pub fn region(&self) -> Option<Region> {
        match self {
            Selection::Valid(region) => Some(*region),
            _ => None,
        }
    }
}
