//! `ratatui-records-core` holds the pieces behind an editable record table for terminal UIs.
//!
//! The heart of the crate is [`edit::RowEditValidator`]: it tracks which cells of the row being
//! edited are in error and refuses to commit the row until none are. Everything else supports it:
//! the record model, per-column validation rules, a single-line input for editing cells, and a
//! virtualized grid to render rows through.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: all components run on the main thread.
//! - Validation is declarative: each column lists its [`validate::Rule`]s and one evaluator
//!   interprets them.
//! - Error state is a value: every blur produces a new [`validate::ValidationState`] through a
//!   pure reducer.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-records`, which renders the table. Use
//! this crate directly to embed the validator in another renderer.
//!
//! ```
//! use ratatui_records_core::column::record_columns;
//! use ratatui_records_core::edit::{CellRef, RowEditValidator};
//! use ratatui_records_core::record::FieldKey;
//! use ratatui_records_core::validate::RuleTable;
//!
//! let mut validator = RowEditValidator::new(RuleTable::from_columns(&record_columns()));
//! let cell = CellRef::new(1, FieldKey::FirstName);
//! validator.on_cell_blur(cell, "", "First Name");
//! assert_eq!(validator.error(&cell), Some("First Name is required"));
//! assert!(!validator.can_commit());
//! ```
pub mod theme;

pub mod render;
pub mod viewport;

pub mod input;
#[cfg(feature = "crossterm")]
pub mod crossterm_input;
pub mod keymap;

pub mod column;
pub mod edit;
pub mod error;
pub mod record;
pub mod sample;
pub mod validate;

pub mod datagrid;
pub mod line_input;
