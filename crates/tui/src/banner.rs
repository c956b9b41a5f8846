use std::collections::HashMap;

use once_cell::sync::Lazy;

const GLYPH_HEIGHT: usize = 5;
const GLYPH_WIDTH: usize = 5;
const SPACING: usize = 1;
const FILL_CHAR: char = '█';
const SHADOW_CHAR: char = '▒';

type Glyph = [&'static str; GLYPH_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('A', [" ### ", "#   #", "#####", "#   #", "#   #"]),
        ('E', ["#####", "#    ", "#### ", "#    ", "#####"]),
        ('G', [" ####", "#    ", "#  ##", "#   #", " ### "]),
        ('H', ["#   #", "#   #", "#####", "#   #", "#   #"]),
        ('L', ["#    ", "#    ", "#    ", "#    ", "#####"]),
        ('M', ["#   #", "## ##", "# # #", "#   #", "#   #"]),
        ('O', [" ### ", "#   #", "#   #", "#   #", " ### "]),
        ('R', ["#### ", "#   #", "#### ", "#  # ", "#   #"]),
        ('U', ["#   #", "#   #", "#   #", "#   #", " ### "]),
        ('V', ["#   #", "#   #", "#   #", " # # ", "  #  "]),
        (' ', ["     ", "     ", "     ", "     ", "     "]),
    ])
});

/// Render `text` in the banner font with a one-cell drop shadow.
///
/// Characters without a glyph render as blanks.
pub fn render(text: &str) -> Vec<String> {
    let glyphs: Vec<&Glyph> = text
        .chars()
        .map(|ch| ch.to_ascii_uppercase())
        .filter_map(|ch| GLYPHS.get(&ch).or_else(|| GLYPHS.get(&' ')))
        .collect();
    if glyphs.is_empty() {
        return Vec::new();
    }

    let width = glyphs.len() * (GLYPH_WIDTH + SPACING) + 1;
    let mut canvas = vec![vec![' '; width]; GLYPH_HEIGHT + 1];
    for (index, glyph) in glyphs.iter().enumerate() {
        let x_offset = index * (GLYPH_WIDTH + SPACING);
        for (y, row) in glyph.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                if symbol == '#' {
                    place(&mut canvas, y + 1, x_offset + x + 1, SHADOW_CHAR);
                    place(&mut canvas, y, x_offset + x, FILL_CHAR);
                }
            }
        }
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

fn place(canvas: &mut [Vec<char>], y: usize, x: usize, ch: char) {
    let Some(cell) = canvas.get_mut(y).and_then(|row| row.get_mut(x)) else {
        return;
    };
    if *cell == ' ' || (*cell == SHADOW_CHAR && ch == FILL_CHAR) {
        *cell = ch;
    }
}
