use std::collections::BTreeMap;

use crate::edit::CellRef;
use crate::record::RecordId;

/// Result of evaluating one cell's rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(String),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(msg) => Some(msg),
        }
    }
}

/// Cells currently in error, with their messages.
///
/// A cell is present iff the last value blurred in it failed validation. The value is never
/// mutated in place: [`reduce`] returns a new state for every verdict.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationState {
    errors: BTreeMap<CellRef, String>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, cell: &CellRef) -> Option<&str> {
        self.errors.get(cell).map(String::as_str)
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        self.errors.contains_key(cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &str)> {
        self.errors.iter().map(|(cell, msg)| (cell, msg.as_str()))
    }
}

/// Drops the entries of one row, e.g. when its edit session closes.
pub fn without_row(state: &ValidationState, row: RecordId) -> ValidationState {
    ValidationState {
        errors: state
            .errors
            .iter()
            .filter(|(cell, _)| cell.row != row)
            .map(|(cell, msg)| (*cell, msg.clone()))
            .collect(),
    }
}

/// Folds one verdict into `state`.
pub fn reduce(state: &ValidationState, cell: CellRef, verdict: Verdict) -> ValidationState {
    let mut errors = state.errors.clone();
    match verdict {
        Verdict::Invalid(msg) => {
            errors.insert(cell, msg);
        }
        Verdict::Valid => {
            errors.remove(&cell);
        }
    }
    ValidationState { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldKey;

    fn cell(field: FieldKey) -> CellRef {
        CellRef { row: 1, field }
    }

    #[test]
    fn reduce_leaves_input_untouched() {
        let before = ValidationState::new();
        let after = reduce(
            &before,
            cell(FieldKey::Email),
            Verdict::Invalid("Email is required".into()),
        );
        assert!(before.is_empty());
        assert_eq!(after.get(&cell(FieldKey::Email)), Some("Email is required"));
    }

    #[test]
    fn invalid_overwrites_previous_message() {
        let s = reduce(
            &ValidationState::new(),
            cell(FieldKey::Age),
            Verdict::Invalid("Age is required".into()),
        );
        let s = reduce(
            &s,
            cell(FieldKey::Age),
            Verdict::Invalid("Age must be a whole number".into()),
        );
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(&cell(FieldKey::Age)), Some("Age must be a whole number"));
    }

    #[test]
    fn without_row_keeps_other_rows() {
        let other = CellRef {
            row: 2,
            field: FieldKey::Email,
        };
        let s = reduce(
            &ValidationState::new(),
            cell(FieldKey::Age),
            Verdict::Invalid("Age is required".into()),
        );
        let s = reduce(&s, other, Verdict::Invalid("Email is required".into()));
        let closed = without_row(&s, 1);
        assert_eq!(s.len(), 2);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed.get(&other), Some("Email is required"));
    }

    #[test]
    fn valid_on_untracked_cell_is_a_no_op() {
        let s = reduce(&ValidationState::new(), cell(FieldKey::LastName), Verdict::Valid);
        assert_eq!(s, ValidationState::new());
    }
}
