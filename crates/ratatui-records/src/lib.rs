//! `ratatui-records` is an editable record table for terminal UIs.
//!
//! [`table::RecordTable`] shows [`record::Record`]s in a virtualized grid with a global filter,
//! column sorting, pagination and row selection. Rows are edited in a modal: each field is
//! re-validated when it loses focus, its error is shown inline, and saving is refused while any
//! field of the row is in error.
//!
//! The table does not own an event loop. Feed it [`input::InputEvent`]s and render it into a
//! ratatui [`Buffer`](ratatui::buffer::Buffer):
//!
//! ```
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//! use ratatui_records::input::KeyCode;
//! use ratatui_records::sample::sample_records;
//! use ratatui_records::table::{RecordTable, TableAction};
//! use ratatui_records::theme::Theme;
//!
//! let mut table = RecordTable::new(sample_records());
//! assert_eq!(table.handle_event(KeyCode::Enter.into()), TableAction::EditStarted(1));
//!
//! let area = Rect::new(0, 0, 100, 20);
//! let mut buf = Buffer::empty(area);
//! table.render(area, &mut buf, &Theme::default());
//! ```
//!
//! Committed rows go to a [`edit::CommitSink`] and toolbar/row actions to an
//! [`actions::ActionHandler`]; both default to implementations that only log through `tracing`.
pub use ratatui_records_core::column;
#[cfg(feature = "crossterm")]
pub use ratatui_records_core::crossterm_input;
pub use ratatui_records_core::datagrid;
pub use ratatui_records_core::edit;
pub use ratatui_records_core::error;
pub use ratatui_records_core::input;
pub use ratatui_records_core::keymap;
pub use ratatui_records_core::line_input;
pub use ratatui_records_core::record;
pub use ratatui_records_core::render;
pub use ratatui_records_core::sample;
pub use ratatui_records_core::theme;
pub use ratatui_records_core::validate;
pub use ratatui_records_core::viewport;

pub mod actions;
pub mod help;
pub mod options;

pub mod form;
pub mod row_model;
pub mod table;
