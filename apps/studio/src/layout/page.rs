//! Printed page geometry.
//!
//! Layout works in CSS pixels (96 per inch); the PDF works in points (72 per
//! inch). Everything converts through the constants below.

use serde::{Deserialize, Serialize};

pub const PT_PER_PX: f32 = 0.75;
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Paper size and margins of an exported page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_top_mm: f32,
    pub margin_right_mm: f32,
    pub margin_bottom_mm: f32,
    pub margin_left_mm: f32,
}

impl PageSetup {
    /// A4 portrait with the print margins of the export: 12mm on top and on
    /// the sides, 14mm at the bottom.
    pub fn a4_portrait() -> Self {
        PageSetup {
            width_pt: 595.28,
            height_pt: 841.89,
            margin_top_mm: 12.0,
            margin_right_mm: 12.0,
            margin_bottom_mm: 14.0,
            margin_left_mm: 12.0,
        }
    }

    /// `@page { size: ... }` keyword.
    pub fn size_name(&self) -> &'static str {
        "A4"
    }

    pub fn margin_top_pt(&self) -> f32 {
        self.margin_top_mm * PT_PER_MM
    }

    pub fn margin_left_pt(&self) -> f32 {
        self.margin_left_mm * PT_PER_MM
    }

    pub fn content_width_pt(&self) -> f32 {
        self.width_pt - (self.margin_left_mm + self.margin_right_mm) * PT_PER_MM
    }

    pub fn content_height_pt(&self) -> f32 {
        self.height_pt - (self.margin_top_mm + self.margin_bottom_mm) * PT_PER_MM
    }

    pub fn content_width_px(&self) -> f32 {
        self.content_width_pt() / PT_PER_PX
    }

    pub fn content_height_px(&self) -> f32 {
        self.content_height_pt() / PT_PER_PX
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4_portrait()
    }
}
