//! Per-column validation rules and the cell error state they feed.

mod rule;
mod state;

pub use rule::Rule;
pub use state::ValidationState;
pub use state::Verdict;
pub use state::reduce;
pub use state::without_row;

use std::collections::BTreeMap;

use crate::column::ColumnDef;
use crate::record::FieldKey;

/// Column key → ordered rules, interpreted by [`RuleTable::evaluate`].
///
/// A field with no entry has no rules and always validates.
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: BTreeMap<FieldKey, Vec<Rule>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the rules declared on each editable column.
    pub fn from_columns(columns: &[ColumnDef]) -> Self {
        let mut table = Self::new();
        for col in columns.iter().filter(|c| c.editable && !c.rules.is_empty()) {
            table.rules.insert(col.key, col.rules.clone());
        }
        table
    }

    pub fn with_rule(mut self, field: FieldKey, rule: Rule) -> Self {
        self.push(field, rule);
        self
    }

    pub fn push(&mut self, field: FieldKey, rule: Rule) {
        self.rules.entry(field).or_default().push(rule);
    }

    pub fn rules_for(&self, field: FieldKey) -> &[Rule] {
        self.rules.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Runs the field's rules in order; the first failure decides the message.
    pub fn evaluate(&self, field: FieldKey, label: &str, value: &str) -> Verdict {
        self.rules_for(field)
            .iter()
            .find(|rule| !rule.check(value))
            .map(|rule| Verdict::Invalid(rule.message(label)))
            .unwrap_or(Verdict::Valid)
    }
}
