//! Conversion between generic map coordinates and robot-native coordinates.
//!
//! Generic coordinates are what callers use when they describe zones. Every
//! robot family declares a [`CoordinateTransform`] with its own scale and
//! origin; the mapping is affine and exactly invertible.

use serde::{Deserialize, Serialize};

/// A point in generic map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in robot-native coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

/// Affine mapping `device = (generic - origin) / scale`, with an optional
/// flipped y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    scale: f64,
    origin_x: f64,
    origin_y: f64,
    invert_y: bool,
    /// Inclusive generic-coordinate bounds on both axes
    bounds: (f64, f64),
}

impl CoordinateTransform {
    pub const fn new(
        scale: f64,
        origin_x: f64,
        origin_y: f64,
        invert_y: bool,
        bounds: (f64, f64),
    ) -> Self {
        Self {
            scale,
            origin_x,
            origin_y,
            invert_y,
            bounds,
        }
    }

    pub fn to_device(&self, point: MapPoint) -> DevicePoint {
        let y = if self.invert_y {
            (self.origin_y - point.y) / self.scale
        } else {
            (point.y - self.origin_y) / self.scale
        };
        DevicePoint {
            x: (point.x - self.origin_x) / self.scale,
            y,
        }
    }

    pub fn to_generic(&self, point: DevicePoint) -> MapPoint {
        let y = if self.invert_y {
            self.origin_y - point.y * self.scale
        } else {
            point.y * self.scale + self.origin_y
        };
        MapPoint {
            x: point.x * self.scale + self.origin_x,
            y,
        }
    }

    /// Whether the point lies within the declared map bounds.
    pub fn contains(&self, point: MapPoint) -> bool {
        let (min, max) = self.bounds;
        (min..=max).contains(&point.x) && (min..=max).contains(&point.y)
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.bounds
    }
}

/// Format a device coordinate with exactly four decimal places.
pub fn format_coordinate(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    // Never emit a signed zero
    if formatted == "-0.0000" {
        "0.0000".to_string()
    } else {
        formatted
    }
}
