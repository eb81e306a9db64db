use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

const TAB_COLS: usize = 4;

/// Writes `input` starting at display column `start_col`, never exceeding `max_cols` cells.
///
/// Tabs expand to four spaces; a wide character that straddles either edge is skipped instead of
/// being cut in half.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    let span = Span::styled(input, style);
    render_spans_clipped(x, y, start_col, max_cols, buf, &[span], style);
}

/// Like [`render_str_clipped`], for styled spans. Unstyled spans take `fallback_style`.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'_>],
    fallback_style: Style,
) {
    let start = start_col as usize;
    let end = start + max_cols as usize;
    let mut col = 0usize;
    let mut cx = x;
    for (ch, w, style) in display_cells(spans, fallback_style) {
        let from = col;
        col += w;
        if from < start {
            continue;
        }
        if col > end {
            break;
        }
        if let Some(cell) = buf.cell_mut((cx, y)) {
            cell.set_char(ch).set_style(style);
        }
        if w == 2 {
            if let Some(cell) = buf.cell_mut((cx + 1, y)) {
                cell.set_symbol("").set_style(style);
            }
        }
        cx += w as u16;
    }
}

/// Each visible character with its width and style; tabs expand, zero-width characters drop out.
fn display_cells<'a>(
    spans: &'a [Span<'a>],
    fallback: Style,
) -> impl Iterator<Item = (char, usize, Style)> + 'a {
    spans.iter().flat_map(move |span| {
        let style = if span.style == Style::default() {
            fallback
        } else {
            span.style
        };
        span.content.chars().flat_map(move |ch| {
            let (ch, w, n) = match ch {
                '\t' => (' ', 1, TAB_COLS),
                _ => (ch, UnicodeWidthChar::width(ch).unwrap_or(0), 1),
            };
            std::iter::repeat_n((ch, w, style), if w == 0 { 0 } else { n })
        })
    })
}

fn take_cols(input: &str, max_cols: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_cols {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

/// Truncates `input` to `max_cols`, replacing the last visible column with `…` when it overflows.
pub fn truncate_with_ellipsis(input: &str, max_cols: u16) -> String {
    if UnicodeWidthStr::width(input) <= max_cols as usize {
        return input.to_string();
    }
    if max_cols == 0 {
        return String::new();
    }
    let mut out = take_cols(input, max_cols as usize - 1);
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn render_str_clipped_respects_start_and_width() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        render_str_clipped(0, 0, 2, 3, &mut buf, "abcdef", Style::default());
        assert_eq!(row_text(&buf, 4), "cde ");
    }

    #[test]
    fn render_spans_clipped_expands_tabs() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let spans = vec![Span::raw("\t1")];
        render_spans_clipped(0, 0, 0, 6, &mut buf, &spans, Style::default());
        assert!(row_text(&buf, 6).starts_with("    1"));
    }

    #[test]
    fn truncate_marks_overflow() {
        assert_eq!(truncate_with_ellipsis("Isabella", 5), "Isab…");
        assert_eq!(truncate_with_ellipsis("Lee", 5), "Lee");
        assert_eq!(truncate_with_ellipsis("你好世界", 4), "你…");
    }
}
