//! Column descriptors consumed by the table renderer.

use crate::record::FieldKey;
use crate::record::Status;
use crate::validate::Rule;

/// How a cell is edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    /// Accepts digits and a leading minus sign only.
    Number,
    /// Cycles through a fixed option list instead of free text.
    Select(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub key: FieldKey,
    pub label: String,
    pub width: u16,
    pub editable: bool,
    pub sortable: bool,
    pub input: InputKind,
    pub rules: Vec<Rule>,
}

impl ColumnDef {
    pub fn new(key: FieldKey, label: impl Into<String>, width: u16) -> Self {
        Self {
            key,
            label: label.into(),
            width,
            editable: true,
            sortable: true,
            input: InputKind::Text,
            rules: Vec::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn input(mut self, input: InputKind) -> Self {
        self.input = input;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Columns of the record table. Status is a select and carries no rules.
pub fn record_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(FieldKey::Id, "ID", 8)
            .read_only()
            .unsortable(),
        ColumnDef::new(FieldKey::FirstName, "First Name", 14).rule(Rule::Required),
        ColumnDef::new(FieldKey::LastName, "Last Name", 14).rule(Rule::Required),
        ColumnDef::new(FieldKey::Email, "Email", 28)
            .input(InputKind::Email)
            .rule(Rule::Required),
        ColumnDef::new(FieldKey::Age, "Age", 6)
            .input(InputKind::Number)
            .rule(Rule::Required),
        ColumnDef::new(FieldKey::Status, "Status", 10).input(InputKind::Select(
            Status::ALL.iter().map(|s| s.to_string()).collect(),
        )),
        ColumnDef::new(FieldKey::DateJoined, "Date Joined", 12).rule(Rule::Required),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::RuleTable;

    #[test]
    fn status_and_id_are_not_validated() {
        let table = RuleTable::from_columns(&record_columns());
        assert!(table.rules_for(FieldKey::Status).is_empty());
        assert!(table.rules_for(FieldKey::Id).is_empty());
        assert_eq!(table.rules_for(FieldKey::FirstName).len(), 1);
        assert_eq!(table.rules_for(FieldKey::DateJoined).len(), 1);
    }
}
