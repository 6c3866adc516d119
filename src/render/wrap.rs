//! Manual text layout: greedy, character-granular line wrapping.
//!
//! Text is split on `\n`, then placed one character at a time. A character
//! that would cross the cell's right edge moves to a new visual line. The
//! nominal alignment only picks each line's starting point; glyphs are
//! always drawn left/top aligned at the computed position.
//!
//! Every character width is rounded to a whole pixel and a line's width is
//! the sum of its rounded character widths. Centering, the line-count
//! estimate and placement all use that one rule.

/// Horizontal placement of each line inside the cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of the text block inside the cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Rectangle of the cell (or merged block) in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CellBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayoutOptions {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    /// Inset from the cell's left/top edge for left/top aligned text
    pub padding: f64,
    /// Advance between visual lines
    pub line_height: f64,
}

/// One glyph's final position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub ch: char,
    /// Character index in the full text, newlines included
    pub index: usize,
    pub x: f64,
    pub y: f64,
    /// Rounded advance width
    pub width: f64,
}

/// Result of laying out one cell's text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub glyphs: Vec<GlyphPlacement>,
    /// Visual lines used, wraps included
    pub line_count: usize,
}

struct Measured {
    ch: char,
    index: usize,
    width: f64,
}

/// Lay out `text` inside `cell`.
///
/// `measure` returns the advance of the character at a given index; it is
/// called exactly once per character, in order.
pub fn layout_text(
    text: &str,
    cell: CellBox,
    options: TextLayoutOptions,
    mut measure: impl FnMut(usize, char) -> f64,
) -> TextLayout {
    if text.is_empty() {
        return TextLayout::default();
    }

    let mut index = 0;
    let lines: Vec<Vec<Measured>> = text
        .split('\n')
        .map(|line| {
            let measured = line
                .chars()
                .map(|ch| {
                    let m = Measured {
                        ch,
                        index,
                        width: measure(index, ch).round(),
                    };
                    index += 1;
                    m
                })
                .collect();
            // the newline itself
            index += 1;
            measured
        })
        .collect();
    let widths: Vec<f64> = lines
        .iter()
        .map(|line| line.iter().map(|m| m.width).sum())
        .collect();

    let mut y = match options.vertical {
        VerticalAlign::Top => cell.top + options.padding,
        VerticalAlign::Middle => {
            let block = estimated_line_count(&widths, cell.width) * options.line_height;
            ((cell.height - block) / 2.0).max(0.0) + cell.top + options.padding
        }
        VerticalAlign::Bottom => {
            let block = estimated_line_count(&widths, cell.width) * options.line_height;
            (cell.height - block - options.padding).max(0.0) + cell.top
        }
    };

    let mut layout = TextLayout::default();
    for (line, &line_width) in lines.iter().zip(&widths) {
        let start = match options.horizontal {
            HorizontalAlign::Left => cell.left + options.padding,
            HorizontalAlign::Center => ((cell.width - line_width) / 2.0).max(0.0) + cell.left,
            HorizontalAlign::Right => {
                (cell.width - line_width - options.padding).max(0.0) + cell.left
            }
        };
        let mut x = start;
        for m in line {
            if x > start && x + m.width > cell.right() {
                y += options.line_height;
                x = start;
                layout.line_count += 1;
            }
            layout.glyphs.push(GlyphPlacement {
                ch: m.ch,
                index: m.index,
                x,
                y,
                width: m.width,
            });
            x += m.width;
        }
        y += options.line_height;
        layout.line_count += 1;
    }
    layout
}

/// Explicit lines plus the wraps each line is expected to need.
#[allow(clippy::cast_precision_loss)]
fn estimated_line_count(widths: &[f64], cell_width: f64) -> f64 {
    let wraps: f64 = if cell_width > 0.0 {
        widths.iter().map(|w| (w / cell_width).round()).sum()
    } else {
        0.0
    };
    widths.len() as f64 + wraps
}
