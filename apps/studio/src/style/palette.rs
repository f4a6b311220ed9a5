//! Concrete colours behind the colour tokens used by themes and templates.
//!
//! Values are the standard utility palette (`<family>-<shade>`), so the
//! exported PDF paints the same RGB the preview shows on screen.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::hex(0xffffff);
    pub const BLACK: Rgb = Rgb::hex(0x000000);

    pub const fn hex(value: u32) -> Rgb {
        Rgb {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Components scaled to `0.0..=1.0`, the form PDF colour operators take.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

const SHADES: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

#[rustfmt::skip]
const SLATE: [u32; 10] = [
    0xf8fafc, 0xf1f5f9, 0xe2e8f0, 0xcbd5e1, 0x94a3b8, 0x64748b, 0x475569, 0x334155, 0x1e293b, 0x0f172a,
];
#[rustfmt::skip]
const EMERALD: [u32; 10] = [
    0xecfdf5, 0xd1fae5, 0xa7f3d0, 0x6ee7b7, 0x34d399, 0x10b981, 0x059669, 0x047857, 0x065f46, 0x064e3b,
];
#[rustfmt::skip]
const INDIGO: [u32; 10] = [
    0xeef2ff, 0xe0e7ff, 0xc7d2fe, 0xa5b4fc, 0x818cf8, 0x6366f1, 0x4f46e5, 0x4338ca, 0x3730a3, 0x312e81,
];
#[rustfmt::skip]
const ROSE: [u32; 10] = [
    0xfff1f2, 0xffe4e6, 0xfecdd3, 0xfda4af, 0xfb7185, 0xf43f5e, 0xe11d48, 0xbe123c, 0x9f1239, 0x881337,
];
#[rustfmt::skip]
const PURPLE: [u32; 10] = [
    0xfaf5ff, 0xf3e8ff, 0xe9d5ff, 0xd8b4fe, 0xc084fc, 0xa855f7, 0x9333ea, 0x7e22ce, 0x6b21a8, 0x581c87,
];
#[rustfmt::skip]
const TEAL: [u32; 10] = [
    0xf0fdfa, 0xccfbf1, 0x99f6e4, 0x5eead4, 0x2dd4bf, 0x14b8a6, 0x0d9488, 0x0f766e, 0x115e59, 0x134e4a,
];
#[rustfmt::skip]
const PINK: [u32; 10] = [
    0xfdf2f8, 0xfce7f3, 0xfbcfe8, 0xf9a8d4, 0xf472b6, 0xec4899, 0xdb2777, 0xbe185d, 0x9d174d, 0x831843,
];

fn family_table(family: &str) -> Option<&'static [u32; 10]> {
    match family {
        "slate" => Some(&SLATE),
        "emerald" => Some(&EMERALD),
        "indigo" => Some(&INDIGO),
        "rose" => Some(&ROSE),
        "purple" => Some(&PURPLE),
        "teal" => Some(&TEAL),
        "pink" => Some(&PINK),
        _ => None,
    }
}

/// Resolves a colour name such as `indigo-700`, `white` or `black`.
pub fn lookup(name: &str) -> Option<Rgb> {
    match name {
        "white" => return Some(Rgb::WHITE),
        "black" => return Some(Rgb::BLACK),
        _ => {}
    }
    let (family, shade) = name.rsplit_once('-')?;
    let shade: u16 = shade.parse().ok()?;
    let table = family_table(family)?;
    let idx = SHADES.iter().position(|s| *s == shade)?;
    Some(Rgb::hex(table[idx]))
}
