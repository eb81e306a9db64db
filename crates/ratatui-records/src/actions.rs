use ratatui_records_core::record::Record;

/// Row and toolbar actions other than editing.
///
/// These are the seam where a backend plugs in. [`LogActions`] only logs.
pub trait ActionHandler {
    fn create(&mut self);

    fn delete(&mut self, record: &Record);

    /// `records` is every row that passes the current filter, before pagination.
    fn export(&mut self, records: &[&Record]);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogActions;

impl ActionHandler for LogActions {
    fn create(&mut self) {
        tracing::info!("create new account requested");
    }

    fn delete(&mut self, record: &Record) {
        tracing::info!(row = record.id, "delete requested");
    }

    fn export(&mut self, records: &[&Record]) {
        tracing::info!(rows = records.len(), "export requested");
    }
}
