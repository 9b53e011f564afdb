// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    #[allow(dead_code)]
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Meadow,
    Dusk,
    Ocean,
    Sakura,
    Night,
    Mono,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphMode {
    Unicode,
    Ascii,
}
