// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::config::ColorBg;
use crate::runtime::{ColorMode, ColorScheme};

/// Resolved colors for one scheme, already downconverted for the
/// terminal's color mode. Particle shade lists are indexed per particle
/// so neighbors of the same kind do not look identical.
#[derive(Clone, Debug)]
pub struct Palette {
    pub bg: Option<Color>,
    pub cloud: Vec<Color>,
    pub leaf: Vec<Color>,
    pub dust: Vec<Color>,
    pub border: Option<Color>,
    pub title: Option<Color>,
    pub subtitle: Option<Color>,
    pub text: Option<Color>,
    pub user: Option<Color>,
    pub assistant: Option<Color>,
    pub key: Option<Color>,
}

struct SchemeRgb {
    bg: (u8, u8, u8),
    cloud: &'static [(u8, u8, u8)],
    leaf: &'static [(u8, u8, u8)],
    dust: &'static [(u8, u8, u8)],
    border: (u8, u8, u8),
    title: (u8, u8, u8),
    subtitle: (u8, u8, u8),
    text: (u8, u8, u8),
    user: (u8, u8, u8),
    assistant: (u8, u8, u8),
    key: (u8, u8, u8),
}

// Default scheme: emerald headings, white clouds, pale-green leaves,
// warm-yellow dust.
const MEADOW: SchemeRgb = SchemeRgb {
    bg: (10, 22, 14),
    cloud: &[(235, 240, 238), (205, 215, 210), (180, 195, 188)],
    leaf: &[(110, 231, 183), (52, 211, 153), (16, 185, 129)],
    dust: &[(254, 249, 195), (253, 230, 138)],
    border: (52, 120, 88),
    title: (4, 120, 87),
    subtitle: (5, 150, 105),
    text: (222, 232, 226),
    user: (16, 185, 129),
    assistant: (167, 243, 208),
    key: (252, 211, 77),
};

const DUSK: SchemeRgb = SchemeRgb {
    bg: (24, 14, 28),
    cloud: &[(216, 180, 254), (192, 132, 252), (168, 85, 247)],
    leaf: &[(251, 146, 60), (249, 115, 22), (234, 88, 12)],
    dust: &[(253, 224, 71), (250, 204, 21)],
    border: (126, 74, 145),
    title: (192, 132, 252),
    subtitle: (216, 180, 254),
    text: (232, 222, 238),
    user: (168, 85, 247),
    assistant: (233, 213, 255),
    key: (250, 204, 21),
};

const OCEAN: SchemeRgb = SchemeRgb {
    bg: (6, 18, 30),
    cloud: &[(186, 230, 253), (125, 211, 252), (56, 189, 248)],
    leaf: &[(45, 212, 191), (20, 184, 166), (13, 148, 136)],
    dust: &[(224, 242, 254), (148, 210, 240)],
    border: (40, 110, 150),
    title: (56, 189, 248),
    subtitle: (125, 211, 252),
    text: (220, 232, 240),
    user: (14, 165, 233),
    assistant: (186, 230, 253),
    key: (253, 224, 71),
};

const SAKURA: SchemeRgb = SchemeRgb {
    bg: (28, 16, 20),
    cloud: &[(252, 231, 243), (251, 207, 232), (249, 168, 212)],
    leaf: &[(244, 114, 182), (236, 72, 153), (219, 39, 119)],
    dust: &[(254, 240, 138), (253, 230, 138)],
    border: (150, 80, 110),
    title: (244, 114, 182),
    subtitle: (249, 168, 212),
    text: (240, 226, 232),
    user: (236, 72, 153),
    assistant: (251, 207, 232),
    key: (253, 224, 71),
};

const NIGHT: SchemeRgb = SchemeRgb {
    bg: (8, 10, 22),
    cloud: &[(148, 163, 184), (100, 116, 139), (71, 85, 105)],
    leaf: &[(129, 140, 248), (99, 102, 241), (79, 70, 229)],
    dust: &[(226, 232, 240), (165, 180, 252)],
    border: (70, 80, 120),
    title: (129, 140, 248),
    subtitle: (165, 180, 252),
    text: (214, 220, 232),
    user: (99, 102, 241),
    assistant: (199, 210, 254),
    key: (250, 204, 21),
};

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cr = CUBE_LEVELS[r6 as usize];
    let cg = CUBE_LEVELS[g6 as usize];
    let cb = CUBE_LEVELS[b6 as usize];
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(r, g, b, cr, cg, cb);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_idx = if avg < 8 {
        16
    } else if avg > 238 {
        231
    } else {
        232 + ((avg - 8) / 10)
    };
    let (gr, gg, gb) = if gray_idx == 16 {
        (0, 0, 0)
    } else if gray_idx == 231 {
        (255, 255, 255)
    } else {
        let v = 8 + 10 * (gray_idx - 232);
        (v, v, v)
    };
    let gray_dist = dist2(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (c, (cr, cg, cb)) in TABLE {
        let d = dist2(r, g, b, cr, cg, cb);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

fn convert(mode: ColorMode, (r, g, b): (u8, u8, u8)) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
        ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
    }
}

fn convert_list(mode: ColorMode, list: &[(u8, u8, u8)]) -> Vec<Color> {
    match mode {
        ColorMode::Mono => vec![Color::White],
        _ => list.iter().filter_map(|&rgb| convert(mode, rgb)).collect(),
    }
}

pub fn build_palette(scheme: ColorScheme, mode: ColorMode, color_bg: ColorBg) -> Palette {
    let rgb = match scheme {
        ColorScheme::Meadow | ColorScheme::Mono => &MEADOW,
        ColorScheme::Dusk => &DUSK,
        ColorScheme::Ocean => &OCEAN,
        ColorScheme::Sakura => &SAKURA,
        ColorScheme::Night => &NIGHT,
    };
    let mode = if scheme == ColorScheme::Mono {
        ColorMode::Mono
    } else {
        mode
    };

    let bg = match color_bg {
        ColorBg::Black => Some(Color::Black),
        ColorBg::Themed => convert(mode, rgb.bg),
        ColorBg::Transparent => None,
    };

    Palette {
        bg,
        cloud: convert_list(mode, rgb.cloud),
        leaf: convert_list(mode, rgb.leaf),
        dust: convert_list(mode, rgb.dust),
        border: convert(mode, rgb.border),
        title: convert(mode, rgb.title),
        subtitle: convert(mode, rgb.subtitle),
        text: convert(mode, rgb.text),
        user: convert(mode, rgb.user),
        assistant: convert(mode, rgb.assistant),
        key: convert(mode, rgb.key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi256_maps_primaries_into_the_cube() {
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 0, 0), 196);
        assert_eq!(rgb_to_ansi256(0, 255, 0), 46);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
    }

    #[test]
    fn mono_scheme_has_no_foreground_colors() {
        let p = build_palette(ColorScheme::Mono, ColorMode::TrueColor, ColorBg::Transparent);
        assert!(p.title.is_none());
        assert!(p.text.is_none());
        assert_eq!(p.leaf, vec![Color::White]);
    }

    #[test]
    fn truecolor_palette_keeps_rgb_values() {
        let p = build_palette(ColorScheme::Meadow, ColorMode::TrueColor, ColorBg::Themed);
        assert_eq!(p.bg, Some(Color::Rgb { r: 10, g: 22, b: 14 }));
        assert_eq!(p.cloud.len(), 3);
    }
}
