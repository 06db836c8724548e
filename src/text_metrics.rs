use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use ttf_parser::Face;

// Loaded once and never mutated afterwards.
static FONT_DB: Lazy<Database> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    db
});

/// Average advance of a glyph relative to the font size, used when no font
/// can be found.
const FALLBACK_ADVANCE: f64 = 0.56;

/// Width of a single line of text, from the first matching system font.
pub fn measure_text_width(text: &str, font_size: f64, font_family: &str) -> f64 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    measure_with_font(text, font_size, font_family)
        .unwrap_or_else(|| estimate_text_width(text, font_size))
}

/// Font-independent width estimate.
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    if font_size <= 0.0 {
        return 0.0;
    }
    let glyphs = text.chars().filter(|ch| *ch != '\n').count();
    glyphs as f64 * font_size * FALLBACK_ADVANCE
}

fn measure_with_font(text: &str, font_size: f64, font_family: &str) -> Option<f64> {
    let names = split_family_list(font_family);
    let families: Vec<Family<'_>> = names.iter().map(FamilyName::as_family).collect();
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = FONT_DB.query(&query)?;
    FONT_DB
        .with_face_data(id, |data, index| {
            let face = Face::parse(data, index).ok()?;
            let scale = font_size / f64::from(face.units_per_em().max(1));
            let fallback = font_size * FALLBACK_ADVANCE;
            let width = text
                .chars()
                .filter(|ch| *ch != '\n')
                .map(|ch| {
                    face.glyph_index(ch)
                        .and_then(|glyph| face.glyph_hor_advance(glyph))
                        .map(|advance| f64::from(advance) * scale)
                        .unwrap_or(fallback)
                })
                .sum::<f64>();
            Some(width.max(0.0))
        })
        .flatten()
}

enum FamilyName {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
    Named(String),
}

impl FamilyName {
    fn as_family(&self) -> Family<'_> {
        match self {
            FamilyName::Serif => Family::Serif,
            FamilyName::SansSerif => Family::SansSerif,
            FamilyName::Monospace => Family::Monospace,
            FamilyName::Cursive => Family::Cursive,
            FamilyName::Fantasy => Family::Fantasy,
            FamilyName::Named(name) => Family::Name(name.as_str()),
        }
    }
}

fn split_family_list(font_family: &str) -> Vec<FamilyName> {
    let mut names: Vec<FamilyName> = font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .filter(|raw| !raw.is_empty())
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "serif" => FamilyName::Serif,
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                FamilyName::SansSerif
            }
            "monospace" | "ui-monospace" => FamilyName::Monospace,
            "cursive" => FamilyName::Cursive,
            "fantasy" => FamilyName::Fantasy,
            _ => FamilyName::Named(raw.to_string()),
        })
        .collect();
    if names.is_empty() {
        names.push(FamilyName::SansSerif);
    }
    names
}
