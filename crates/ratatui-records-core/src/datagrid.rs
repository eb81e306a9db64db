use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use crate::theme::Theme;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::ScrollbarState;
use ratatui::widgets::StatefulWidget;
use std::sync::Arc;
use virtualizer::Align;
use virtualizer::VirtualItem;
use virtualizer::Virtualizer;
use virtualizer::VirtualizerOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataGridAction {
    None,
    Redraw,
    Activated(Cell),
}

/// A grid cell address, in view coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Column header and width for [`DataGridView`].
#[derive(Clone, Debug)]
pub struct DataGridColumn {
    pub title: String,
    pub width: u16,
}

impl DataGridColumn {
    pub fn new(title: impl Into<String>, width: u16) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

/// Options for [`DataGridView`].
///
/// Rows and columns are virtualized via the `virtualizer` crate; cell content is drawn by a
/// caller-supplied callback.
#[derive(Clone, Debug)]
pub struct DataGridViewOptions {
    pub show_header: bool,
    pub show_scrollbar_y: bool,
    pub overscan_rows: usize,
    pub overscan_cols: usize,
    pub col_gap: u32,
    pub style: Style,
    pub header_style: Style,
    pub grid_line_style: Style,
    pub scrollbar_style: Style,
    pub cursor_style: Style,
    pub cursor_row_style: Style,
}

impl Default for DataGridViewOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            show_scrollbar_y: true,
            overscan_rows: 2,
            overscan_cols: 2,
            col_gap: 1,
            style: Style::default(),
            header_style: Style::default().add_modifier(Modifier::BOLD),
            grid_line_style: Style::default(),
            scrollbar_style: Style::default(),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            cursor_row_style: Style::default().add_modifier(Modifier::BOLD),
        }
    }
}

/// Context passed to the `render_cell` callback in [`DataGridView::render`].
#[derive(Clone, Copy, Debug)]
pub struct DataGridCellContext {
    pub cell: Cell,
    pub col_width: u16,
    /// Columns of the cell scrolled off the left edge.
    pub clip_left: u32,
    pub is_cursor: bool,
    pub is_cursor_row: bool,
    /// Style already applied to the cell background.
    pub style: Style,
}

/// One virtualized axis and the items it produced on the last render.
struct Axis {
    virt: Virtualizer,
    items: Vec<VirtualItem>,
}

impl Axis {
    fn new(opts: VirtualizerOptions) -> Self {
        Self {
            virt: Virtualizer::new(opts),
            items: Vec::new(),
        }
    }

    fn offset(&self) -> u32 {
        self.virt.scroll_offset().min(u32::MAX as u64) as u32
    }

    fn total(&self) -> u32 {
        self.virt.total_size().min(u32::MAX as u64) as u32
    }

    /// Pushes count, viewport and offset into the virtualizer and returns the clamped offset.
    fn sync(&mut self, count: usize, viewport: u16, offset: u32, overscan: usize) -> u32 {
        self.virt.set_count(count);
        self.virt.set_viewport_size(viewport as u32);
        self.virt.set_scroll_offset(offset as u64);
        self.virt.set_overscan(overscan);
        self.offset()
    }

    fn reveal(&mut self, index: usize) -> u32 {
        self.virt.scroll_to_index(index, Align::Auto);
        self.offset()
    }

    fn collect(&mut self) {
        self.virt.collect_virtual_items(&mut self.items);
    }
}

/// A virtualized grid with a keyboard cursor.
///
/// It only knows view coordinates: row `n` is whatever the caller draws in the `n`th row.
pub struct DataGridView {
    pub state: ViewportState,
    options: DataGridViewOptions,
    columns: Vec<DataGridColumn>,
    rows: usize,
    cursor: Option<Cell>,
    row_axis: Axis,
    col_axis: Axis,
}

impl Default for DataGridView {
    fn default() -> Self {
        Self::with_options(DataGridViewOptions::default())
    }
}

struct BodyStyles {
    base: Style,
    cursor: Style,
    cursor_row: Style,
    grid_line: Style,
}

impl DataGridView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DataGridViewOptions) -> Self {
        Self {
            state: ViewportState::default(),
            row_axis: row_axis(0, &options),
            col_axis: col_axis(&[], &options),
            options,
            columns: Vec::new(),
            rows: 0,
            cursor: None,
        }
    }

    pub fn options(&self) -> &DataGridViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DataGridViewOptions) {
        self.options = options;
        self.row_axis = row_axis(self.rows, &self.options);
        self.col_axis = col_axis(&self.columns, &self.options);
        self.sync_axes();
    }

    pub fn set_row_count(&mut self, rows: usize) {
        self.rows = rows;
        self.row_axis = row_axis(rows, &self.options);
        self.cursor = clamp_cursor(self.cursor, self.rows, self.columns.len());
        self.sync_axes();
    }

    /// Replaces the columns. Titles may change freely; widths are re-measured.
    pub fn set_columns(&mut self, columns: Vec<DataGridColumn>) {
        self.col_axis = col_axis(&columns, &self.options);
        self.columns = columns;
        self.cursor = clamp_cursor(self.cursor, self.rows, self.columns.len());
        self.sync_axes();
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[DataGridColumn] {
        &self.columns
    }

    pub fn cursor(&self) -> Option<Cell> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<Cell>) {
        self.cursor = clamp_cursor(cursor, self.rows, self.columns.len());
        self.ensure_cursor_visible();
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DataGridAction {
        match event {
            InputEvent::Paste(_) => DataGridAction::None,
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        self.sync_axes();
        self.state.scroll_y_by(delta);
        self.state.y = self.row_axis.sync(
            self.rows,
            self.state.viewport_h,
            self.state.y,
            self.options.overscan_rows,
        );
    }

    pub fn ensure_cursor_visible(&mut self) {
        self.sync_axes();
        let Some(c) = self.cursor else {
            return;
        };
        self.state.y = self.row_axis.reveal(c.row);
        self.state.x = self.col_axis.reveal(c.col);
        self.state.clamp();
    }

    pub fn render<F>(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, mut render_cell: F)
    where
        F: FnMut(Rect, DataGridCellContext, &mut Buffer, &Theme),
    {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let show_bar = self.options.show_scrollbar_y && area.width >= 2;
        let content = Rect {
            width: area.width - u16::from(show_bar),
            ..area
        };
        let header_h = u16::from(self.options.show_header).min(content.height);
        let [header, body] =
            Layout::vertical([Constraint::Length(header_h), Constraint::Min(0)]).areas(content);

        let base = if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        let grid_line = if self.options.grid_line_style == Style::default() {
            theme.text_muted
        } else {
            self.options.grid_line_style
        };
        let styles = BodyStyles {
            base,
            cursor: self.options.cursor_style.patch(theme.accent),
            cursor_row: base.patch(self.options.cursor_row_style),
            grid_line,
        };

        buf.set_style(content, base);

        self.state.set_viewport(body.width, body.height);
        self.sync_axes();
        self.row_axis.collect();
        self.col_axis.collect();

        if header.height > 0 {
            let header_style = self.options.header_style.patch(theme.accent);
            self.render_header(header, buf, header_style, grid_line);
        }
        self.render_body(body, buf, theme, &styles, &mut render_cell);

        if show_bar {
            self.render_scrollbar(Rect::new(area.right() - 1, body.y, 1, body.height), buf);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> DataGridAction {
        if self.rows == 0 || self.columns.is_empty() {
            self.cursor = None;
            self.state.reset();
            return DataGridAction::None;
        }

        self.sync_axes();

        let page = self.state.viewport_h.saturating_sub(1).max(1) as i32;
        let cur = self.cursor.unwrap_or_default();
        let last_row = self.rows - 1;
        let last_col = self.columns.len() - 1;
        let ctrl = key.modifiers.ctrl && !key.modifiers.alt;

        let target = match (key.code, ctrl) {
            (KeyCode::Char('d'), true) | (KeyCode::PageDown, false) => return self.page_by(page),
            (KeyCode::Char('u'), true) | (KeyCode::PageUp, false) => return self.page_by(-page),
            (_, true) => return DataGridAction::None,
            (KeyCode::Enter, _) => {
                return self
                    .cursor
                    .map(DataGridAction::Activated)
                    .unwrap_or(DataGridAction::None);
            }
            (KeyCode::Down | KeyCode::Char('j'), _) => Cell {
                row: (cur.row + 1).min(last_row),
                ..cur
            },
            (KeyCode::Up | KeyCode::Char('k'), _) => Cell {
                row: cur.row.saturating_sub(1),
                ..cur
            },
            (KeyCode::Right | KeyCode::Char('l'), _) => Cell {
                col: (cur.col + 1).min(last_col),
                ..cur
            },
            (KeyCode::Left | KeyCode::Char('h'), _) => Cell {
                col: cur.col.saturating_sub(1),
                ..cur
            },
            (KeyCode::Home, _) => Cell::default(),
            (KeyCode::End, _) => Cell {
                row: last_row,
                col: last_col,
            },
            (KeyCode::Char('g'), _) => Cell { row: 0, ..cur },
            (KeyCode::Char('G'), _) => Cell {
                row: last_row,
                ..cur
            },
            _ => return DataGridAction::None,
        };
        self.move_to(target)
    }

    fn move_to(&mut self, target: Cell) -> DataGridAction {
        if self.cursor == Some(target) {
            return DataGridAction::None;
        }
        self.cursor = Some(target);
        self.ensure_cursor_visible();
        DataGridAction::Redraw
    }

    fn page_by(&mut self, delta: i32) -> DataGridAction {
        self.scroll_y_by(delta);
        let col = self.cursor.map_or(0, |c| c.col);
        let row = self
            .row_axis
            .virt
            .index_at_offset(self.row_axis.virt.scroll_offset())
            .unwrap_or(0);
        self.cursor = clamp_cursor(Some(Cell { row, col }), self.rows, self.columns.len());
        DataGridAction::Redraw
    }

    fn sync_axes(&mut self) {
        self.state.y = self.row_axis.sync(
            self.rows,
            self.state.viewport_h,
            self.state.y,
            self.options.overscan_rows,
        );
        self.state.x = self.col_axis.sync(
            self.columns.len(),
            self.state.viewport_w,
            self.state.x,
            self.options.overscan_cols,
        );
        self.state
            .set_content(self.col_axis.total(), self.row_axis.total());
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, style: Style, grid_line: Style) {
        if area.width == 0 || self.columns.is_empty() {
            return;
        }
        buf.set_style(area, style);

        let scroll_x = self.col_axis.virt.scroll_offset();
        for item in self.col_axis.items.iter().copied() {
            let (dx, w, clip) = visible_span(item.start, item.size, scroll_x, area.width);
            if w == 0 {
                continue;
            }
            let title = &self.columns[item.index].title;
            render::render_str_clipped(area.x + dx, area.y, clip, w, buf, title, style);
            self.draw_separator(area, buf, item, grid_line);
        }
    }

    fn render_body<F>(
        &self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        styles: &BodyStyles,
        render_cell: &mut F,
    ) where
        F: FnMut(Rect, DataGridCellContext, &mut Buffer, &Theme),
    {
        if area.width == 0 || area.height == 0 || self.rows == 0 || self.columns.is_empty() {
            return;
        }

        let scroll_x = self.col_axis.virt.scroll_offset();
        let scroll_y = self.row_axis.virt.scroll_offset();

        for row_item in self.row_axis.items.iter().copied() {
            let (dy, h, _) = visible_span(row_item.start, row_item.size, scroll_y, area.height);
            if h == 0 {
                continue;
            }
            let row_rect = Rect::new(area.x, area.y + dy, area.width, h);
            let is_cursor_row = self.cursor.is_some_and(|c| c.row == row_item.index);

            for col_item in self.col_axis.items.iter().copied() {
                let (dx, w, clip_left) =
                    visible_span(col_item.start, col_item.size, scroll_x, area.width);
                if w == 0 {
                    continue;
                }
                let cell_rect = Rect::new(area.x + dx, row_rect.y, w, h);

                let cell = Cell {
                    row: row_item.index,
                    col: col_item.index,
                };
                let is_cursor = self.cursor == Some(cell);
                let style = match (is_cursor, is_cursor_row) {
                    (true, _) => styles.cursor,
                    (false, true) => styles.cursor_row,
                    (false, false) => styles.base,
                };
                buf.set_style(cell_rect, style);

                let ctx = DataGridCellContext {
                    cell,
                    col_width: self.columns[col_item.index].width,
                    clip_left,
                    is_cursor,
                    is_cursor_row,
                    style,
                };
                render_cell(cell_rect, ctx, buf, theme);
                self.draw_separator(row_rect, buf, col_item, styles.grid_line);
            }
        }
    }

    fn draw_separator(&self, area: Rect, buf: &mut Buffer, item: VirtualItem, style: Style) {
        if self.options.col_gap == 0 || item.index + 1 >= self.columns.len() {
            return;
        }
        let edge =
            (item.start + item.size as u64) as i64 - self.col_axis.virt.scroll_offset() as i64;
        if !(0..area.width as i64).contains(&edge) {
            return;
        }
        let x = area.x + edge as u16;
        for y in area.top()..area.bottom() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol("│").set_style(style);
            }
        }
    }

    fn render_scrollbar(&self, area: Rect, buf: &mut Buffer) {
        let (_, max) = self.state.max_offset();
        if area.height == 0 || max == 0 {
            return;
        }
        let mut state = ScrollbarState::new(max as usize + 1)
            .position(self.state.y as usize)
            .viewport_content_length(self.state.viewport_h as usize);
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .style(self.options.scrollbar_style)
            .render(area, buf, &mut state);
    }
}

fn row_axis(rows: usize, options: &DataGridViewOptions) -> Axis {
    let mut opts = VirtualizerOptions::new(rows, |_| 1);
    opts.overscan = options.overscan_rows;
    Axis::new(opts)
}

fn col_axis(columns: &[DataGridColumn], options: &DataGridViewOptions) -> Axis {
    let widths: Arc<Vec<u32>> = Arc::new(columns.iter().map(|c| c.width as u32).collect());
    let mut opts = VirtualizerOptions::new(columns.len(), move |i| {
        widths.get(i).copied().unwrap_or(1).max(1)
    });
    opts.gap = options.col_gap;
    opts.overscan = options.overscan_cols;
    Axis::new(opts)
}

fn clamp_cursor(cursor: Option<Cell>, rows: usize, cols: usize) -> Option<Cell> {
    if rows == 0 || cols == 0 {
        return None;
    }
    let c = cursor.unwrap_or_default();
    Some(Cell {
        row: c.row.min(rows - 1),
        col: c.col.min(cols - 1),
    })
}

/// Where an item spanning `[start, start + size)` lands in a viewport of `extent` cells scrolled
/// to `scroll`: `(offset, visible length, cells cut off at the leading edge)`.
fn visible_span(start: u64, size: u32, scroll: u64, extent: u16) -> (u16, u16, u32) {
    let rel = start as i64 - scroll as i64;
    let clipped = (-rel).max(0) as u32;
    let offset = rel.clamp(0, extent as i64) as u16;
    let len = size.saturating_sub(clipped).min((extent - offset) as u32) as u16;
    (offset, len, clipped)
}
