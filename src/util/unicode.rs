use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.split('\t')
        .enumerate()
        .map(|(i, part)| {
            let w = UnicodeWidthStr::width(part);
            if i > 0 { w + 4 } else { w }
        })
        .sum()
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Left-align `s` in a cell of `cells` width, truncating when too long.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let s = truncate_to_width(s, cells);
    let pad = cells.saturating_sub(display_width(&s));
    format!("{}{}", s, " ".repeat(pad))
}

/// First line of a possibly multi-line value, marked when more follows.
pub fn first_line(s: &str) -> String {
    let mut lines = s.lines();
    match (lines.next(), lines.next()) {
        (Some(first), Some(_)) => format!("{} \u{21b5}", first),
        (Some(first), None) => first.to_string(),
        _ => String::new(),
    }
}
