//! The one-line key hint under the table and at the bottom of the edit modal.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui_records_core::keymap::Binding;
use ratatui_records_core::keymap::EditBindings;
use ratatui_records_core::keymap::TableBindings;
use ratatui_records_core::render;
use ratatui_records_core::theme::Theme;

use crate::options::TableFeatures;

const SEPARATOR: &str = " • ";

/// Browse-mode bindings in display order, leaving out keys whose feature is off.
pub fn table_hints<'a>(bindings: &'a TableBindings, features: &TableFeatures) -> Vec<&'a Binding> {
    let mut hints = Vec::new();
    if features.editing {
        hints.push(&bindings.edit);
    }
    if features.row_actions {
        hints.push(&bindings.delete);
    }
    hints.extend([&bindings.create, &bindings.export]);
    if features.global_filter {
        hints.push(&bindings.filter);
    }
    if features.sorting {
        hints.push(&bindings.sort);
    }
    if features.pagination {
        hints.extend([&bindings.prev_page, &bindings.next_page, &bindings.page_size]);
    }
    hints
}

pub fn edit_hints(bindings: &EditBindings) -> Vec<&Binding> {
    vec![
        &bindings.next_field,
        &bindings.prev_field,
        &bindings.save,
        &bindings.cancel,
    ]
}

/// Draws `key description` pairs on the first row of `area`, clipped to its width.
pub fn render_hints(area: Rect, buf: &mut Buffer, hints: &[&Binding], theme: &Theme) {
    if area.is_empty() {
        return;
    }
    buf.set_style(area, theme.text_muted);

    let mut spans = Vec::with_capacity(hints.len() * 4);
    for (i, b) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(SEPARATOR, theme.text_muted));
        }
        spans.push(Span::styled(b.help_key.as_str(), theme.accent));
        spans.push(Span::styled(" ", theme.text_muted));
        spans.push(Span::styled(b.help_desc.as_str(), theme.text_muted));
    }
    render::render_spans_clipped(area.x, area.y, 0, area.width, buf, &spans, theme.text_muted);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn disabled_features_drop_their_hints() {
        let bindings = TableBindings::default();
        let features = TableFeatures {
            sorting: false,
            pagination: false,
            ..Default::default()
        };
        let keys: Vec<_> = table_hints(&bindings, &features)
            .iter()
            .map(|b| b.help_key.as_str())
            .collect();
        assert_eq!(keys, ["e", "d", "n", "x", "/"]);
    }

    #[test]
    fn renders_pairs_and_clips() {
        let bindings = EditBindings::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 1));
        render_hints(buf.area, &mut buf, &edit_hints(&bindings), &Theme::default());
        assert!(line(&buf).starts_with("tab next field • S-tab prev field"));

        let mut narrow = Buffer::empty(Rect::new(0, 0, 3, 1));
        render_hints(narrow.area, &mut narrow, &edit_hints(&bindings), &Theme::default());
        assert_eq!(line(&narrow), "tab");
    }
}
