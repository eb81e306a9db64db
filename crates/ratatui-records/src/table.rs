use std::collections::BTreeSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui_records_core::column::ColumnDef;
use ratatui_records_core::column::InputKind;
use ratatui_records_core::column::record_columns;
use ratatui_records_core::datagrid::Cell;
use ratatui_records_core::datagrid::DataGridAction;
use ratatui_records_core::datagrid::DataGridColumn;
use ratatui_records_core::datagrid::DataGridView;
use ratatui_records_core::edit::CellRef;
use ratatui_records_core::edit::CommitSink;
use ratatui_records_core::edit::EditEvent;
use ratatui_records_core::edit::EditOutcome;
use ratatui_records_core::edit::LogSink;
use ratatui_records_core::edit::RowEditValidator;
use ratatui_records_core::error::CommitBlocked;
use ratatui_records_core::input::InputEvent;
use ratatui_records_core::input::KeyCode;
use ratatui_records_core::input::KeyEvent;
use ratatui_records_core::line_input::LineInput;
use ratatui_records_core::line_input::LineInputAction;
use ratatui_records_core::record::FieldKey;
use ratatui_records_core::record::Record;
use ratatui_records_core::record::RecordId;
use ratatui_records_core::render;
use ratatui_records_core::theme::Theme;
use ratatui_records_core::validate::RuleTable;
use unicode_width::UnicodeWidthStr;

use crate::actions::ActionHandler;
use crate::actions::LogActions;
use crate::form::EditForm;
use crate::form::FormAction;
use crate::help;
use crate::options::TableFeatures;
use crate::options::TableOptions;
use crate::row_model::RowModel;
use crate::row_model::RowView;
use crate::row_model::SortDirection;

const ACTIONS_TITLE: &str = "Actions";
const ACTIONS_W: u16 = 13;
const CREATE_LABEL: &str = " [n] Create New Account ";
const EXPORT_LABEL: &str = " [x] Export All Data ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableAction {
    None,
    Redraw,
    EditStarted(RecordId),
    /// A cell of the open row was re-evaluated on blur.
    Validated {
        cell: CellRef,
        error: Option<String>,
    },
    /// The row passed validation, went to the commit sink and replaced the stored record.
    Committed(RecordId),
    CommitBlocked(CommitBlocked),
    /// Every cell passed its rules but the values do not fit the record, e.g. an age of `-`.
    Rejected(String),
    Cancelled(RecordId),
    DeleteRequested(RecordId),
    CreateRequested,
    ExportRequested {
        rows: usize,
    },
    RowSelectionToggled(RecordId),
}

/// An editable, filterable, sortable and paginated table of [`Record`]s.
///
/// Rows are edited in a modal. Each blur re-validates the field that lost focus and saving is
/// refused while any field of the row is in error. Committed rows go to the [`CommitSink`] `S`;
/// create/delete/export go to the [`ActionHandler`] `A`.
pub struct RecordTable<S: CommitSink = LogSink, A: ActionHandler = LogActions> {
    records: Vec<Record>,
    columns: Vec<ColumnDef>,
    options: TableOptions,
    grid: DataGridView,
    validator: RowEditValidator<S>,
    actions: A,
    model: RowModel,
    view: RowView,
    form: Option<EditForm>,
    filter_input: Option<LineInput>,
    selected: BTreeSet<RecordId>,
    status: Option<String>,
}

impl RecordTable {
    pub fn new(records: Vec<Record>) -> Self {
        Self::with_parts(
            records,
            record_columns(),
            TableOptions::default(),
            LogSink,
            LogActions,
        )
    }
}

impl<S: CommitSink, A: ActionHandler> RecordTable<S, A> {
    pub fn with_parts(
        records: Vec<Record>,
        columns: Vec<ColumnDef>,
        options: TableOptions,
        sink: S,
        actions: A,
    ) -> Self {
        let rules = RuleTable::from_columns(&columns);
        let model = RowModel::new(options.page_size, options.features.pagination);
        let mut table = Self {
            records,
            columns,
            grid: DataGridView::with_options(options.grid.clone()),
            options,
            validator: RowEditValidator::with_sink(rules, sink),
            actions,
            model,
            view: RowView::default(),
            form: None,
            filter_input: None,
            selected: BTreeSet::new(),
            status: None,
        };
        table.refresh();
        table
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn validator(&self) -> &RowEditValidator<S> {
        &self.validator
    }

    pub fn sink(&self) -> &S {
        self.validator.sink()
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut A {
        &mut self.actions
    }

    pub fn row_model(&self) -> &RowModel {
        &self.model
    }

    pub fn view(&self) -> &RowView {
        &self.view
    }

    /// Records on the current page, in display order.
    pub fn page_records(&self) -> impl Iterator<Item = &Record> {
        self.view.page.iter().map(|&i| &self.records[i])
    }

    pub fn selected(&self) -> &BTreeSet<RecordId> {
        &self.selected
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        self.form.as_mut()
    }

    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    pub fn is_filtering(&self) -> bool {
        self.filter_input.is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Export is available iff at least one row passes the filter.
    pub fn can_export(&self) -> bool {
        !self.view.filtered.is_empty()
    }

    pub fn cursor_record(&self) -> Option<&Record> {
        let c = self.grid.cursor()?;
        let &i = self.view.page.get(c.row)?;
        self.records.get(i)
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.model.set_filter(filter);
        self.refresh();
    }

    pub fn toggle_sort(&mut self, field: FieldKey) -> bool {
        if !self.options.features.sorting {
            return false;
        }
        let sortable = self.columns.iter().any(|c| c.key == field && c.sortable);
        if !sortable {
            return false;
        }
        self.model.toggle_sort(field);
        self.refresh();
        true
    }

    /// Opens the edit modal on `id`. Any open session is cancelled first.
    pub fn start_edit(&mut self, id: RecordId) -> TableAction {
        if !self.options.features.editing {
            return TableAction::None;
        }
        let Some(record) = self.record(id) else {
            return TableAction::None;
        };
        let form = EditForm::open(record, &self.columns);
        if let Some(open) = self.form.take() {
            self.validator.on_row_cancel(open.session().row());
        }
        tracing::debug!(row = id, "edit started");
        self.form = Some(form);
        TableAction::EditStarted(id)
    }

    /// Blurs the focused field, then tries to commit the row.
    pub fn save(&mut self) -> TableAction {
        let Some(form) = self.form.as_mut() else {
            return TableAction::None;
        };
        if let Some(EditEvent::Blur(blur)) = form.blur_focused() {
            self.validator.on_cell_blur(blur.cell, &blur.value, &blur.label);
        }

        let row = form.session().row();
        let Some(idx) = self.records.iter().position(|r| r.id == row) else {
            return TableAction::None;
        };
        let updated = match self.records[idx].with_values(form.session().values()) {
            Ok(r) => Some(r),
            Err(e) if self.validator.can_commit() => {
                tracing::warn!(row, error = %e, "row rejected");
                let msg = e.to_string();
                form.set_notice(Some(msg.clone()));
                return TableAction::Rejected(msg);
            }
            // Blocked anyway; the validator reports why.
            Err(_) => None,
        };

        match self.validator.dispatch(form.save_event()) {
            Ok(EditOutcome::Committed(commit)) => {
                if let Some(updated) = updated {
                    self.records[idx] = updated;
                }
                self.form = None;
                self.status = Some(format!("Saved row {}", commit.row));
                self.refresh();
                TableAction::Committed(commit.row)
            }
            Ok(_) => TableAction::Redraw,
            Err(blocked) => {
                form.set_notice(Some(format!("Cannot save: {blocked}")));
                TableAction::CommitBlocked(blocked)
            }
        }
    }

    pub fn cancel(&mut self) -> TableAction {
        let Some(form) = self.form.take() else {
            return TableAction::None;
        };
        match self.validator.dispatch(form.cancel_event()) {
            Ok(EditOutcome::Cancelled(row)) => TableAction::Cancelled(row),
            _ => TableAction::Redraw,
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> TableAction {
        if self.form.is_some() {
            return self.handle_edit_event(event);
        }
        if self.filter_input.is_some() {
            return self.handle_filter_event(event);
        }
        match event {
            InputEvent::Key(key) => self.handle_browse_key(key),
            InputEvent::Paste(_) => TableAction::None,
        }
    }

    fn handle_edit_event(&mut self, event: InputEvent) -> TableAction {
        let Some(form) = self.form.as_mut() else {
            return TableAction::None;
        };
        match form.handle_event(event, &self.options.edit_bindings) {
            FormAction::None => TableAction::None,
            FormAction::Redraw => TableAction::Redraw,
            FormAction::FocusLeft(blur) => match self.validator.dispatch(blur) {
                Ok(EditOutcome::Validated { cell, error }) => TableAction::Validated { cell, error },
                _ => TableAction::Redraw,
            },
            FormAction::SaveRequested => self.save(),
            FormAction::CancelRequested => self.cancel(),
        }
    }

    fn handle_filter_event(&mut self, event: InputEvent) -> TableAction {
        let Some(input) = self.filter_input.as_mut() else {
            return TableAction::None;
        };
        if let InputEvent::Key(key) = &event {
            match key.code {
                KeyCode::Enter => {
                    self.filter_input = None;
                    return TableAction::Redraw;
                }
                KeyCode::Esc => {
                    self.filter_input = None;
                    self.set_filter("");
                    return TableAction::Redraw;
                }
                _ => {}
            }
        }
        match input.input(event) {
            LineInputAction::Changed => {
                let text = input.text().to_string();
                self.set_filter(text);
                TableAction::Redraw
            }
            LineInputAction::Moved => TableAction::Redraw,
            LineInputAction::None => TableAction::None,
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> TableAction {
        let features = self.options.features;
        let b = &self.options.bindings;

        if features.editing && b.edit.matches(&key) {
            return match self.cursor_record().map(|r| r.id) {
                Some(id) => self.start_edit(id),
                None => TableAction::None,
            };
        }
        if features.row_actions && b.delete.matches(&key) {
            let Some(record) = self.cursor_record() else {
                return TableAction::None;
            };
            let id = record.id;
            let record = record.clone();
            self.actions.delete(&record);
            self.status = Some(format!("Delete requested for row {id}"));
            return TableAction::DeleteRequested(id);
        }
        if b.create.matches(&key) {
            self.actions.create();
            self.status = Some("Create new account requested".to_string());
            return TableAction::CreateRequested;
        }
        if b.export.matches(&key) {
            return self.export();
        }
        if features.global_filter && b.filter.matches(&key) {
            self.filter_input = Some(LineInput::with_text(InputKind::Text, self.model.filter()));
            return TableAction::Redraw;
        }
        if features.sorting && b.sort.matches(&key) {
            let field = self
                .grid
                .cursor()
                .and_then(|c| self.columns.get(c.col))
                .map(|c| c.key);
            let Some(field) = field else {
                return TableAction::None;
            };
            return if self.toggle_sort(field) {
                TableAction::Redraw
            } else {
                TableAction::None
            };
        }
        if features.pagination {
            if b.next_page.matches(&key) {
                return self.page_by(true);
            }
            if b.prev_page.matches(&key) {
                return self.page_by(false);
            }
            if b.page_size.matches(&key) {
                self.cycle_page_size();
                return TableAction::Redraw;
            }
        }
        if features.row_selection && key.code == KeyCode::Char(' ') && key.modifiers.is_plain() {
            let Some(id) = self.cursor_record().map(|r| r.id) else {
                return TableAction::None;
            };
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
            return TableAction::RowSelectionToggled(id);
        }

        match self.grid.handle_event(InputEvent::Key(key)) {
            DataGridAction::None => TableAction::None,
            DataGridAction::Redraw | DataGridAction::Activated(_) => TableAction::Redraw,
        }
    }

    /// Hands every row passing the filter to the action handler.
    pub fn export(&mut self) -> TableAction {
        if !self.can_export() {
            self.status = Some("Nothing to export".to_string());
            return TableAction::None;
        }
        let rows: Vec<&Record> = self.view.filtered.iter().map(|&i| &self.records[i]).collect();
        let n = rows.len();
        self.actions.export(&rows);
        self.status = Some(format!("Exported {n} row(s)"));
        TableAction::ExportRequested { rows: n }
    }

    fn page_by(&mut self, forward: bool) -> TableAction {
        let moved = if forward {
            self.model.next_page(self.view.filtered.len())
        } else {
            self.model.prev_page()
        };
        if !moved {
            return TableAction::None;
        }
        self.refresh();
        self.grid.set_cursor(Some(Cell { row: 0, col: 0 }));
        TableAction::Redraw
    }

    fn cycle_page_size(&mut self) {
        let sizes = &self.options.page_size_options;
        if sizes.is_empty() {
            return;
        }
        let next = sizes
            .iter()
            .position(|&s| s == self.model.page_size())
            .map(|i| sizes[(i + 1) % sizes.len()])
            .unwrap_or(sizes[0]);
        self.model.set_page_size(next);
        self.refresh();
    }

    /// Recomputes the visible rows after the data, filter, sort or page changed.
    pub fn refresh(&mut self) {
        let fields: Vec<FieldKey> = self.columns.iter().map(|c| c.key).collect();
        self.view = self.model.compute(&self.records, &fields);

        let sort = self.model.sort();
        let mut grid_cols: Vec<DataGridColumn> = self
            .columns
            .iter()
            .map(|c| {
                let title = match sort {
                    Some(s) if s.field == c.key => match s.direction {
                        SortDirection::Asc => format!("{} ▲", c.label),
                        SortDirection::Desc => format!("{} ▼", c.label),
                    },
                    _ => c.label.clone(),
                };
                DataGridColumn::new(title, c.width)
            })
            .collect();
        if self.options.features.row_actions {
            grid_cols.push(DataGridColumn::new(ACTIONS_TITLE, ACTIONS_W));
        }
        self.grid.set_columns(grid_cols);
        self.grid.set_row_count(self.view.page.len());
    }

    /// Draws the table and the edit modal, if open. Returns where the terminal cursor belongs.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) -> Option<(u16, u16)> {
        if area.width == 0 || area.height < 3 {
            return None;
        }
        let help_h = u16::from(self.options.show_help);
        let toolbar = Rect::new(area.x, area.y, area.width, 1);
        let footer = Rect::new(area.x, area.bottom() - 1 - help_h, area.width, 1);
        let grid_area = Rect::new(
            area.x,
            area.y + 1,
            area.width,
            area.height.saturating_sub(2 + help_h),
        );

        let mut cursor = self.render_toolbar(toolbar, buf, theme);
        self.render_grid(grid_area, buf, theme);
        self.render_footer(footer, buf, theme);

        if help_h > 0 {
            let hints = if self.form.is_some() {
                help::edit_hints(&self.options.edit_bindings)
            } else {
                help::table_hints(&self.options.bindings, &self.options.features)
            };
            let help_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            help::render_hints(help_area, buf, &hints, theme);
        }

        if let Some(form) = self.form.as_mut() {
            cursor = form.render_ref(
                area,
                buf,
                theme,
                self.validator.state(),
                &self.options.edit_bindings,
            );
        }
        cursor
    }

    fn render_toolbar(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) -> Option<(u16, u16)> {
        let export_style = if self.can_export() {
            theme.button
        } else {
            theme.button_disabled
        };
        let spans = [
            Span::styled(CREATE_LABEL, theme.button),
            Span::styled(" ", theme.text_primary),
            Span::styled(EXPORT_LABEL, export_style),
            Span::styled("  ", theme.text_primary),
        ];
        render::render_spans_clipped(area.x, area.y, 0, area.width, buf, &spans, theme.text_primary);

        if !self.options.features.global_filter {
            return None;
        }
        let used: u16 = spans.iter().map(|s| s.width() as u16).sum();
        let label = "Filter: ";
        let label_x = area.x + used.min(area.width);
        let label_w = area.right().saturating_sub(label_x);
        render::render_str_clipped(label_x, area.y, 0, label_w, buf, label, theme.text_muted);
        let input_x = label_x + (UnicodeWidthStr::width(label) as u16).min(label_w);
        let input_area = Rect::new(input_x, area.y, area.right().saturating_sub(input_x), 1);

        match self.filter_input.as_mut() {
            Some(input) => input.render_ref(input_area, buf, theme.text_primary.patch(theme.field_focus)),
            None => {
                let (text, style) = if self.model.filter().is_empty() {
                    ("/ to search all columns", theme.text_muted)
                } else {
                    (self.model.filter(), theme.text_primary)
                };
                render::render_str_clipped(input_area.x, input_area.y, 0, input_area.width, buf, text, style);
                None
            }
        }
    }

    fn render_grid(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let actions_label = row_actions_label(&self.options.features);
        let Self {
            grid,
            records,
            columns,
            view,
            validator,
            selected,
            ..
        } = self;

        grid.render(area, buf, theme, |cell_area, ctx, buf, theme| {
            if cell_area.width == 0 || cell_area.height == 0 {
                return;
            }
            let Some(record) = view.page.get(ctx.cell.row).and_then(|&i| records.get(i)) else {
                return;
            };

            let (text, style) = match columns.get(ctx.cell.col) {
                Some(col) => {
                    let mut text = record.value(col.key);
                    if ctx.cell.col == 0 && selected.contains(&record.id) {
                        text = format!("✓ {text}");
                    }
                    let style = if validator.error(&CellRef::new(record.id, col.key)).is_some() {
                        ctx.style.patch(theme.danger)
                    } else {
                        ctx.style
                    };
                    (text, style)
                }
                None => (actions_label.clone(), ctx.style.patch(theme.text_muted)),
            };
            let text = if ctx.clip_left == 0 {
                render::truncate_with_ellipsis(&text, cell_area.width)
            } else {
                text
            };
            render::render_str_clipped(
                cell_area.x,
                cell_area.y,
                ctx.clip_left,
                cell_area.width,
                buf,
                &text,
                style,
            );
        });
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let total = self.view.filtered.len();
        let mut text = if self.options.features.pagination {
            let size = self.model.page_size();
            let range = match self.view.visible_range(size) {
                Some((a, b)) => format!("{a}–{b} of {total}"),
                None => format!("0 of {total}"),
            };
            format!(
                "Rows per page: {size} │ {range} │ page {}/{}",
                self.view.page_index + 1,
                self.view.page_count
            )
        } else {
            format!("{total} row(s)")
        };
        if !self.selected.is_empty() {
            text.push_str(&format!(" │ {} selected", self.selected.len()));
        }
        if let Some(status) = &self.status {
            text.push_str(" │ ");
            text.push_str(status);
        }
        render::render_str_clipped(area.x, area.y, 0, area.width, buf, &text, theme.text_muted);
    }
}

/// Text of the per-row actions cell; only actions whose feature is on are listed.
fn row_actions_label(features: &TableFeatures) -> String {
    let mut parts = Vec::new();
    if features.editing {
        parts.push("[e]dit");
    }
    if features.row_actions {
        parts.push("[d]el");
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_records_core::edit::RecordingSink;
    use ratatui_records_core::sample::sample_records;

    fn table() -> RecordTable<RecordingSink, LogActions> {
        RecordTable::with_parts(
            sample_records(),
            record_columns(),
            TableOptions::default(),
            RecordingSink::default(),
            LogActions,
        )
    }

    fn screen(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect::<String>()
                    + "\n"
            })
            .collect()
    }

    #[test]
    fn sort_marks_header() {
        let mut t = table();
        assert!(t.toggle_sort(FieldKey::Age));
        assert!(!t.toggle_sort(FieldKey::Id));

        let area = Rect::new(0, 0, 120, 16);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        let s = screen(&buf);
        assert!(s.contains("Age ▲"));
        assert!(s.contains("Rows per page: 10"));
        assert!(s.contains("Create New Account"));
    }

    #[test]
    fn enter_opens_modal_on_cursor_row() {
        let mut t = table();
        assert_eq!(t.handle_event(KeyCode::Down.into()), TableAction::Redraw);
        assert_eq!(t.handle_event(KeyCode::Enter.into()), TableAction::EditStarted(2));
        assert!(t.is_editing());
    }

    #[test]
    fn space_toggles_selection_by_id() {
        let mut t = table();
        assert_eq!(
            t.handle_event(KeyCode::Char(' ').into()),
            TableAction::RowSelectionToggled(1)
        );
        assert!(t.selected().contains(&1));
        t.handle_event(KeyCode::Char(' ').into());
        assert!(t.selected().is_empty());
    }

    #[test]
    fn actions_label_lists_enabled_actions() {
        assert_eq!(row_actions_label(&TableFeatures::default()), "[e]dit [d]el");
        let no_edit = TableFeatures {
            editing: false,
            ..Default::default()
        };
        assert_eq!(row_actions_label(&no_edit), "[d]el");
    }
}
