use ratatui_records_core::datagrid::DataGridViewOptions;
use ratatui_records_core::keymap::EditBindings;
use ratatui_records_core::keymap::TableBindings;
use serde::Deserialize;

/// Feature switches of [`crate::table::RecordTable`]. All default to on.
///
/// `grouping` and `pinning` are carried for hosts that render those themselves; the built-in
/// renderer does not group rows or pin columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableFeatures {
    pub editing: bool,
    pub row_actions: bool,
    pub sorting: bool,
    pub pagination: bool,
    pub global_filter: bool,
    pub row_selection: bool,
    pub grouping: bool,
    pub pinning: bool,
}

impl Default for TableFeatures {
    fn default() -> Self {
        Self {
            editing: true,
            row_actions: true,
            sorting: true,
            pagination: true,
            global_filter: true,
            row_selection: true,
            grouping: true,
            pinning: true,
        }
    }
}

impl TableFeatures {
    /// Parses a JSON object; missing keys keep their default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug)]
pub struct TableOptions {
    pub features: TableFeatures,
    pub page_size_options: Vec<usize>,
    pub page_size: usize,
    pub grid: DataGridViewOptions,
    pub bindings: TableBindings,
    pub edit_bindings: EditBindings,
    pub show_help: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            features: TableFeatures::default(),
            page_size_options: vec![5, 10, 20],
            page_size: 10,
            grid: DataGridViewOptions::default(),
            bindings: TableBindings::default(),
            edit_bindings: EditBindings::default(),
            show_help: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_from_partial_json() {
        let f = TableFeatures::from_json(r#"{"sorting": false, "globalFilter": false}"#).unwrap();
        assert!(!f.sorting);
        assert!(!f.global_filter);
        assert!(f.editing);
        assert!(f.pagination);
    }
}
