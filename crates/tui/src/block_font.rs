use std::collections::HashMap;

use once_cell::sync::Lazy;

const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 3;
const FILL_CHAR: char = '█';

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('0', ["111", "1 1", "1 1", "1 1", "111"]),
        ('1', [" 1 ", "11 ", " 1 ", " 1 ", "111"]),
        ('2', ["111", "  1", "111", "1  ", "111"]),
        ('3', ["111", "  1", " 11", "  1", "111"]),
        ('4', ["1 1", "1 1", "111", "  1", "  1"]),
        ('5', ["111", "1  ", "111", "  1", "111"]),
        ('6', ["111", "1  ", "111", "1 1", "111"]),
        ('7', ["111", "  1", "  1", " 1 ", " 1 "]),
        ('8', ["111", "1 1", "111", "1 1", "111"]),
        ('9', ["111", "1 1", "111", "  1", "111"]),
        (':', ["   ", " 1 ", "   ", " 1 ", "   "]),
        (' ', ["   ", "   ", "   ", "   ", "   "]),
    ])
});

/// Number of terminal rows produced by [`render`].
pub const HEIGHT: usize = FONT_HEIGHT;

/// Render a clock string such as `00:15` in the block digit font.
///
/// Characters without a glyph render as blanks.
pub fn render(text: &str) -> Vec<String> {
    let content: Vec<char> = text.chars().collect();
    if content.is_empty() {
        return vec![String::new(); FONT_HEIGHT];
    }

    let glyph_width = FONT_WIDTH * 2; // double width so cells look square
    let spacing = 1;
    let total_width = content.len() * glyph_width + content.len().saturating_sub(1) * spacing;
    let mut canvas = vec![vec![' '; total_width]; FONT_HEIGHT];

    for (index, ch) in content.iter().enumerate() {
        let Some(glyph) = GLYPHS.get(ch) else {
            continue;
        };
        paint_glyph(&mut canvas, glyph, index * (glyph_width + spacing));
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

fn paint_glyph(canvas: &mut [Vec<char>], glyph: &Glyph, x_offset: usize) {
    for (row_idx, row) in glyph.iter().enumerate() {
        for (col_idx, symbol) in row.chars().enumerate() {
            if symbol != '1' {
                continue;
            }
            let x = x_offset + col_idx * 2;
            place(canvas, row_idx, x);
            place(canvas, row_idx, x + 1);
        }
    }
}

fn place(canvas: &mut [Vec<char>], y: usize, x: usize) {
    if let Some(cell) = canvas.get_mut(y).and_then(|row| row.get_mut(x)) {
        *cell = FILL_CHAR;
    }
}
