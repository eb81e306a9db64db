//! Row edit sessions and the validator that gates their commit.
//!
//! The renderer owns the [`EditSession`] and reports what happens to it as [`EditEvent`]s. The
//! [`RowEditValidator`] turns blur events into per-cell verdicts and refuses a save while any cell
//! is in error:
//!
//! ```text
//! Untouched ──blur──▶ Valid ◀──blur──▶ Invalid
//! ```
//!
//! An untouched cell has no entry and counts as valid. Saving successfully or cancelling closes
//! the session and drops the entries of that row.

mod sink;

pub use sink::Commit;
pub use sink::CommitSink;
pub use sink::LogSink;
#[cfg(any(test, feature = "test-util"))]
pub use sink::RecordingSink;

use crate::error::CommitBlocked;
use crate::record::CandidateValues;
use crate::record::FieldKey;
use crate::record::Record;
use crate::record::RecordId;
use crate::validate::RuleTable;
use crate::validate::ValidationState;
use crate::validate::reduce;
use crate::validate::without_row;

/// One editable cell of the row being edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: RecordId,
    pub field: FieldKey,
}

impl CellRef {
    pub fn new(row: RecordId, field: FieldKey) -> Self {
        Self { row, field }
    }
}

/// Candidate values of the row in edit mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    row: RecordId,
    values: CandidateValues,
}

impl EditSession {
    pub fn open(record: &Record, fields: impl IntoIterator<Item = FieldKey>) -> Self {
        Self {
            row: record.id,
            values: record.candidate_values(fields),
        }
    }

    pub fn row(&self) -> RecordId {
        self.row
    }

    pub fn cell(&self, field: FieldKey) -> CellRef {
        CellRef::new(self.row, field)
    }

    pub fn value(&self, field: FieldKey) -> &str {
        self.values.get(field).unwrap_or("")
    }

    pub fn set_value(&mut self, field: FieldKey, value: impl Into<String>) {
        self.values.set(field, value);
    }

    pub fn values(&self) -> &CandidateValues {
        &self.values
    }

    pub fn blur(&self, field: FieldKey, label: impl Into<String>) -> EditEvent {
        EditEvent::Blur(BlurEvent {
            cell: self.cell(field),
            value: self.value(field).to_string(),
            label: label.into(),
        })
    }

    pub fn save(&self) -> EditEvent {
        EditEvent::Save(SaveEvent {
            row: self.row,
            values: self.values.clone(),
        })
    }

    pub fn cancel(&self) -> EditEvent {
        EditEvent::Cancel(CancelEvent { row: self.row })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlurEvent {
    pub cell: CellRef,
    pub value: String,
    /// Human-readable field name used in messages.
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveEvent {
    pub row: RecordId,
    pub values: CandidateValues,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancelEvent {
    pub row: RecordId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditEvent {
    Blur(BlurEvent),
    Save(SaveEvent),
    Cancel(CancelEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The cell was re-evaluated; `error` is its message if it is now invalid.
    Validated { cell: CellRef, error: Option<String> },
    /// The row passed the gate and was handed to the sink. Close the session.
    Committed(Commit),
    /// The session was discarded. Close it.
    Cancelled(RecordId),
}

/// Tracks which cells of the open row are in error and gates its commit.
pub struct RowEditValidator<S = LogSink> {
    rules: RuleTable,
    state: ValidationState,
    sink: S,
}

impl RowEditValidator<LogSink> {
    pub fn new(rules: RuleTable) -> Self {
        Self::with_sink(rules, LogSink)
    }
}

impl<S: CommitSink> RowEditValidator<S> {
    pub fn with_sink(rules: RuleTable, sink: S) -> Self {
        Self {
            rules,
            state: ValidationState::new(),
            sink,
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn error(&self, cell: &CellRef) -> Option<&str> {
        self.state.get(cell)
    }

    /// Re-evaluates one cell and records or clears its error.
    pub fn on_cell_blur(&mut self, cell: CellRef, value: &str, label: &str) {
        let verdict = self.rules.evaluate(cell.field, label, value);
        if let Some(msg) = verdict.message() {
            tracing::debug!(row = cell.row, field = %cell.field, error = msg, "cell invalid");
        } else if self.state.contains(&cell) {
            tracing::debug!(row = cell.row, field = %cell.field, "cell error cleared");
        }
        self.state = reduce(&self.state, cell, verdict);
    }

    /// True iff no cell is in error.
    pub fn can_commit(&self) -> bool {
        self.state.is_empty()
    }

    /// Hands `values` to the sink exactly once if the row may be committed.
    ///
    /// When blocked, nothing is forwarded and the error state is left as is.
    pub fn on_row_save(
        &mut self,
        row: RecordId,
        values: CandidateValues,
    ) -> Result<Commit, CommitBlocked> {
        if !self.can_commit() {
            let blocked = CommitBlocked {
                row,
                errors: self
                    .state
                    .iter()
                    .map(|(cell, msg)| (*cell, msg.to_string()))
                    .collect(),
            };
            tracing::warn!(row, invalid = blocked.errors.len(), "commit blocked");
            return Err(blocked);
        }

        let commit = Commit { row, values };
        self.sink.commit(&commit);
        self.close(row);
        Ok(commit)
    }

    pub fn on_row_cancel(&mut self, row: RecordId) {
        self.close(row);
        tracing::debug!(row, "edit cancelled");
    }

    pub fn dispatch(&mut self, event: EditEvent) -> Result<EditOutcome, CommitBlocked> {
        match event {
            EditEvent::Blur(BlurEvent { cell, value, label }) => {
                self.on_cell_blur(cell, &value, &label);
                Ok(EditOutcome::Validated {
                    cell,
                    error: self.state.get(&cell).map(str::to_string),
                })
            }
            EditEvent::Save(SaveEvent { row, values }) => {
                self.on_row_save(row, values).map(EditOutcome::Committed)
            }
            EditEvent::Cancel(CancelEvent { row }) => {
                self.on_row_cancel(row);
                Ok(EditOutcome::Cancelled(row))
            }
        }
    }

    fn close(&mut self, row: RecordId) {
        self.state = without_row(&self.state, row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::record_columns;
    use crate::sample::sample_records;
    use proptest::prelude::*;

    fn validator() -> RowEditValidator<RecordingSink> {
        RowEditValidator::with_sink(
            RuleTable::from_columns(&record_columns()),
            RecordingSink::default(),
        )
    }

    fn first_name() -> CellRef {
        CellRef::new(1, FieldKey::FirstName)
    }

    #[test]
    fn empty_value_marks_cell_required() {
        let mut v = validator();
        v.on_cell_blur(first_name(), "", "First Name");
        assert_eq!(v.error(&first_name()), Some("First Name is required"));
        assert_eq!(v.state().len(), 1);
        assert!(!v.can_commit());
    }

    #[test]
    fn fixing_the_value_clears_the_error() {
        let mut v = validator();
        v.on_cell_blur(first_name(), "  ", "First Name");
        v.on_cell_blur(first_name(), "Jane", "First Name");
        assert!(v.state().is_empty());
        assert!(v.can_commit());
    }

    #[test]
    fn one_of_two_fixed_keeps_the_other() {
        let mut v = validator();
        let last_name = CellRef::new(1, FieldKey::LastName);
        v.on_cell_blur(first_name(), "", "First Name");
        v.on_cell_blur(last_name, "", "Last Name");
        v.on_cell_blur(first_name(), "John", "First Name");
        let remaining: Vec<_> = v.state().iter().map(|(c, m)| (*c, m.to_string())).collect();
        assert_eq!(remaining, vec![(last_name, "Last Name is required".to_string())]);
        assert!(!v.can_commit());
    }

    #[test]
    fn repeated_valid_blur_is_idempotent() {
        let mut v = validator();
        v.on_cell_blur(first_name(), "Jane", "First Name");
        let once = v.state().clone();
        v.on_cell_blur(first_name(), "Jane", "First Name");
        assert_eq!(v.state(), &once);
    }

    #[test]
    fn blocked_save_forwards_nothing() {
        let mut v = validator();
        v.on_cell_blur(first_name(), "", "First Name");
        let before = v.state().clone();
        let err = v.on_row_save(1, CandidateValues::new()).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(
            err.message_for(FieldKey::FirstName),
            Some("First Name is required")
        );
        assert!(v.sink().commits.is_empty());
        assert_eq!(v.state(), &before);
    }

    #[test]
    fn save_commits_once_and_closes_session() {
        let record = &sample_records()[0];
        let mut session = EditSession::open(record, [FieldKey::FirstName, FieldKey::Age]);
        session.set_value(FieldKey::FirstName, "Johnny");

        let mut v = validator();
        v.dispatch(session.blur(FieldKey::FirstName, "First Name"))
            .unwrap();
        let outcome = v.dispatch(session.save()).unwrap();

        let commit = match outcome {
            EditOutcome::Committed(commit) => commit,
            other => panic!("expected a commit, got {other:?}"),
        };
        assert_eq!(commit.values.get(FieldKey::FirstName), Some("Johnny"));
        assert_eq!(v.sink().commits, vec![commit]);
    }

    #[test]
    fn cancel_discards_errors() {
        let mut v = validator();
        v.on_cell_blur(first_name(), "", "First Name");
        let outcome = v.dispatch(EditEvent::Cancel(CancelEvent { row: 1 })).unwrap();
        assert_eq!(outcome, EditOutcome::Cancelled(1));
        assert!(v.can_commit());
    }

    #[test]
    fn closing_one_row_keeps_errors_of_another() {
        let mut v = validator();
        v.on_cell_blur(first_name(), "", "First Name");
        v.dispatch(EditEvent::Cancel(CancelEvent { row: 2 })).unwrap();
        assert_eq!(v.error(&first_name()), Some("First Name is required"));
        assert!(!v.can_commit());
        assert!(v.on_row_save(1, CandidateValues::new()).is_err());
        assert!(v.sink().commits.is_empty());
    }

    #[test]
    fn blur_reports_the_verdict() {
        let mut v = validator();
        let outcome = v
            .dispatch(EditEvent::Blur(BlurEvent {
                cell: first_name(),
                value: String::new(),
                label: "First Name".into(),
            }))
            .unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Validated {
                cell: first_name(),
                error: Some("First Name is required".into()),
            }
        );
    }

    fn editable_field() -> impl Strategy<Value = FieldKey> {
        prop_oneof![
            Just(FieldKey::FirstName),
            Just(FieldKey::LastName),
            Just(FieldKey::Email),
            Just(FieldKey::Age),
            Just(FieldKey::DateJoined),
        ]
    }

    proptest! {
        #[test]
        fn commit_gate_matches_error_state(
            blurs in prop::collection::vec((editable_field(), "[ a-z]{0,3}"), 0..24)
        ) {
            let mut v = validator();
            let mut blank = std::collections::BTreeSet::new();
            for (field, value) in &blurs {
                v.on_cell_blur(CellRef::new(1, *field), value, field.as_str());
                if value.trim().is_empty() {
                    blank.insert(*field);
                } else {
                    blank.remove(field);
                }
                prop_assert_eq!(v.can_commit(), v.state().is_empty());
            }
            prop_assert_eq!(v.state().len(), blank.len());
            prop_assert_eq!(v.on_row_save(1, CandidateValues::new()).is_ok(), blank.is_empty());
        }
    }
}
