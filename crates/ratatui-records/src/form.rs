//! The row edit modal: one [`LineInput`] per editable column over an [`EditSession`].

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use ratatui_records_core::column::ColumnDef;
use ratatui_records_core::edit::EditEvent;
use ratatui_records_core::edit::EditSession;
use ratatui_records_core::input::InputEvent;
use ratatui_records_core::keymap::EditBindings;
use ratatui_records_core::line_input::LineInput;
use ratatui_records_core::line_input::LineInputAction;
use ratatui_records_core::record::FieldKey;
use ratatui_records_core::record::Record;
use ratatui_records_core::render;
use ratatui_records_core::theme::Theme;
use ratatui_records_core::validate::ValidationState;

use crate::help;

const LABEL_W: u16 = 13;
const MODAL_W: u16 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Redraw,
    /// Focus left a field; the event is its blur.
    FocusLeft(EditEvent),
    SaveRequested,
    CancelRequested,
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub key: FieldKey,
    pub label: String,
    pub input: LineInput,
}

/// Editing state of one row. Candidate values live in the session and mirror the inputs.
#[derive(Clone, Debug)]
pub struct EditForm {
    session: EditSession,
    fields: Vec<FormField>,
    focus: usize,
    notice: Option<String>,
}

impl EditForm {
    pub fn open(record: &Record, columns: &[ColumnDef]) -> Self {
        let editable: Vec<&ColumnDef> = columns.iter().filter(|c| c.editable).collect();
        let session = EditSession::open(record, editable.iter().map(|c| c.key));
        let fields = editable
            .iter()
            .map(|c| FormField {
                key: c.key,
                label: c.label.clone(),
                input: LineInput::with_text(c.input.clone(), session.value(c.key)),
            })
            .collect();
        Self {
            session,
            fields,
            focus: 0,
            notice: None,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    /// A message shown under the fields until the next edit, e.g. why a save was refused.
    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Replaces a field's text as if typed.
    pub fn set_value(&mut self, field: FieldKey, value: &str) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.key == field) {
            f.input.set_text(value);
            self.session.set_value(field, f.input.text());
        }
    }

    pub fn focus_field(&mut self, field: FieldKey) -> Option<EditEvent> {
        let idx = self.fields.iter().position(|f| f.key == field)?;
        self.move_focus_to(idx)
    }

    /// The blur event for the focused field.
    pub fn blur_focused(&self) -> Option<EditEvent> {
        let f = self.fields.get(self.focus)?;
        Some(self.session.blur(f.key, f.label.as_str()))
    }

    pub fn save_event(&self) -> EditEvent {
        self.session.save()
    }

    pub fn cancel_event(&self) -> EditEvent {
        self.session.cancel()
    }

    pub fn handle_event(&mut self, event: InputEvent, bindings: &EditBindings) -> FormAction {
        if let InputEvent::Key(key) = &event {
            if bindings.cancel.matches(key) {
                return FormAction::CancelRequested;
            }
            if bindings.save.matches(key) {
                return FormAction::SaveRequested;
            }
            if bindings.next_field.matches(key) {
                let next = (self.focus + 1) % self.fields.len().max(1);
                return self.focus_action(next);
            }
            if bindings.prev_field.matches(key) {
                let len = self.fields.len().max(1);
                let prev = (self.focus + len - 1) % len;
                return self.focus_action(prev);
            }
        }

        let Some(f) = self.fields.get_mut(self.focus) else {
            return FormAction::None;
        };
        match f.input.input(event) {
            LineInputAction::Changed => {
                self.session.set_value(f.key, f.input.text());
                self.notice = None;
                FormAction::Redraw
            }
            LineInputAction::Moved => FormAction::Redraw,
            LineInputAction::None => FormAction::None,
        }
    }

    fn focus_action(&mut self, idx: usize) -> FormAction {
        match self.move_focus_to(idx) {
            Some(ev) => FormAction::FocusLeft(ev),
            None => FormAction::None,
        }
    }

    fn move_focus_to(&mut self, idx: usize) -> Option<EditEvent> {
        if idx == self.focus || idx >= self.fields.len() {
            return None;
        }
        let blur = self.blur_focused();
        self.focus = idx;
        blur
    }

    /// Draws the modal centered in `area` and returns the terminal cursor position.
    pub fn render_ref(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        errors: &ValidationState,
        bindings: &EditBindings,
    ) -> Option<(u16, u16)> {
        let rows = self.fields.len() as u16 * 2 + 2;
        let modal = centered(area, MODAL_W, rows + 2);
        if modal.width < 3 || modal.height < 3 {
            return None;
        }

        Clear.render(modal, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.modal)
            .title(format!(" Edit row {} ", self.session.row()));
        let inner = block.inner(modal);
        block.render(modal, buf);

        let input_x = inner.x + LABEL_W.min(inner.width);
        let input_w = inner.width.saturating_sub(LABEL_W);
        let mut cursor = None;
        let mut y = inner.y;
        for (i, f) in self.fields.iter_mut().enumerate() {
            if y >= inner.bottom() {
                break;
            }
            let focused = i == self.focus;
            let label_style = if focused { theme.accent } else { theme.text_muted };
            render::render_str_clipped(inner.x, y, 0, LABEL_W.min(inner.width), buf, &f.label, label_style);

            let input_style = if focused {
                theme.text_primary.patch(theme.field_focus)
            } else {
                theme.text_primary
            };
            let pos = f
                .input
                .render_ref(Rect::new(input_x, y, input_w, 1), buf, input_style);
            if focused {
                cursor = pos;
            }
            y += 1;

            if y < inner.bottom() {
                if let Some(msg) = errors.get(&self.session.cell(f.key)) {
                    render::render_str_clipped(input_x, y, 0, input_w, buf, msg, theme.danger);
                }
            }
            y += 1;
        }

        if y < inner.bottom() {
            if let Some(notice) = &self.notice {
                render::render_str_clipped(inner.x, y, 0, inner.width, buf, notice, theme.danger);
            }
        }
        let help_y = inner.bottom().saturating_sub(1);
        if help_y > inner.y {
            let help_area = Rect::new(inner.x, help_y, inner.width, 1);
            help::render_hints(help_area, buf, &help::edit_hints(bindings), theme);
        }

        cursor
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_records_core::column::record_columns;
    use ratatui_records_core::edit::CellRef;
    use ratatui_records_core::input::KeyCode;
    use ratatui_records_core::record::CandidateValues;
    use ratatui_records_core::sample::sample_records;
    use ratatui_records_core::validate::Verdict;
    use ratatui_records_core::validate::reduce;

    fn form() -> EditForm {
        EditForm::open(&sample_records()[0], &record_columns())
    }

    #[test]
    fn opens_with_editable_fields_only() {
        let f = form();
        assert_eq!(f.fields().len(), 6);
        assert_eq!(f.fields()[0].key, FieldKey::FirstName);
        assert_eq!(f.session().value(FieldKey::Email), "john@example.com");
    }

    #[test]
    fn tab_emits_blur_for_field_left() {
        let mut f = form();
        let bindings = EditBindings::default();
        for _ in 0..4 {
            f.handle_event(KeyCode::Backspace.into(), &bindings);
        }
        assert_eq!(f.session().value(FieldKey::FirstName), "");

        let action = f.handle_event(KeyCode::Tab.into(), &bindings);
        let FormAction::FocusLeft(EditEvent::Blur(blur)) = action else {
            panic!("expected blur, got {action:?}");
        };
        assert_eq!(blur.cell, CellRef::new(1, FieldKey::FirstName));
        assert_eq!(blur.value, "");
        assert_eq!(blur.label, "First Name");
        assert_eq!(f.focus(), 1);
    }

    #[test]
    fn back_tab_wraps_to_last_field() {
        let mut f = form();
        f.handle_event(KeyCode::BackTab.into(), &EditBindings::default());
        assert_eq!(f.focused_field().map(|f| f.key), Some(FieldKey::DateJoined));
    }

    #[test]
    fn save_and_cancel_are_requests() {
        let mut f = form();
        let bindings = EditBindings::default();
        assert_eq!(
            f.handle_event(KeyCode::Enter.into(), &bindings),
            FormAction::SaveRequested
        );
        assert_eq!(
            f.handle_event(KeyCode::Esc.into(), &bindings),
            FormAction::CancelRequested
        );
    }

    #[test]
    fn save_event_carries_all_candidate_values() {
        let mut f = form();
        f.set_value(FieldKey::LastName, "Roe");
        let EditEvent::Save(save) = f.save_event() else {
            panic!("expected save");
        };
        let expected: CandidateValues = sample_records()[0]
            .candidate_values(f.fields().iter().map(|f| f.key))
            .iter()
            .map(|(k, v)| {
                let v = if k == FieldKey::LastName { "Roe" } else { v };
                (k, v.to_string())
            })
            .collect();
        assert_eq!(save.values, expected);
    }

    #[test]
    fn renders_inline_error_under_field() {
        let mut f = form();
        let cell = CellRef::new(1, FieldKey::FirstName);
        let errors = reduce(
            &ValidationState::new(),
            cell,
            Verdict::Invalid("First Name is required".into()),
        );
        let area = Rect::new(0, 0, 70, 20);
        let mut buf = Buffer::empty(area);
        let cursor = f.render_ref(area, &mut buf, &Theme::default(), &errors, &EditBindings::default());
        assert!(cursor.is_some());

        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect::<String>()
                    + "\n"
            })
            .collect();
        assert!(text.contains("Edit row 1"));
        assert!(text.contains("First Name is required"));
    }
}
