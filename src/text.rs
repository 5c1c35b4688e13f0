//! Text measurement.
//!
//! Card boxes are sized from their label text, so the layout pass needs
//! real glyph advances. A process-wide measurer resolves font families
//! through `fontdb` and reads horizontal advances with `ttf-parser`; when
//! no matching face exists the width falls back to a fixed per-character
//! estimate so layout stays deterministic on fontless systems.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Fallback advance as a fraction of the font size.
const FALLBACK_ADVANCE: f32 = 0.56;

/// Width of `text` at `font_size` in the first resolvable face of
/// `font_family` (a CSS-style comma-separated list).
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    let measured = TEXT_MEASURER
        .lock()
        .ok()
        .and_then(|mut guard| guard.measure(text, font_size, font_family));
    measured.unwrap_or_else(|| fallback_width(text, font_size))
}

fn fallback_width(text: &str, font_size: f32) -> f32 {
    text.chars().filter(|ch| *ch != '\n').count() as f32 * font_size * FALLBACK_ADVANCE
}

struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    advances: HashMap<char, Option<u16>>,
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<LoadedFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_string();
        if !self.faces.contains_key(&key) {
            let loaded = self.load_face(font_family);
            self.faces.insert(key.clone(), loaded);
        }
        let face = self.faces.get_mut(&key)?.as_mut()?;
        face.measure_width(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<LoadedFace> {
        let mut names: Vec<String> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if !raw.is_empty() {
                names.push(raw.to_string());
            }
        }

        let mut families: Vec<Family<'_>> = Vec::with_capacity(names.len() + 1);
        for name in &names {
            match name.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" => families.push(Family::SansSerif),
                "monospace" | "ui-monospace" => families.push(Family::Monospace),
                "cursive" => families.push(Family::Cursive),
                "fantasy" => families.push(Family::Fantasy),
                _ => families.push(Family::Name(name.as_str())),
            }
        }
        families.push(Family::SansSerif);

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<LoadedFace> = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                loaded = Some(LoadedFace {
                    data: data.to_vec(),
                    index,
                    units_per_em: face.units_per_em().max(1),
                    advances: HashMap::new(),
                });
            }
        });
        loaded
    }
}

impl LoadedFace {
    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let face = Face::parse(&self.data, self.index).ok()?;
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * FALLBACK_ADVANCE;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = *self.advances.entry(ch).or_insert_with(|| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
            });
            match advance {
                Some(units) => width += units as f32 * scale,
                None => width += fallback,
            }
        }
        Some(width.max(0.0))
    }
}

/// Greedy word wrap bounded by an approximate character budget per line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
