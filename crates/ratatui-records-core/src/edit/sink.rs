use crate::record::CandidateValues;
use crate::record::RecordId;

/// A row edit that passed the commit gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub row: RecordId,
    pub values: CandidateValues,
}

/// Receives committed rows. This is where a backend call belongs.
pub trait CommitSink {
    fn commit(&mut self, commit: &Commit);
}

/// Logs each commit and does nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl CommitSink for LogSink {
    fn commit(&mut self, commit: &Commit) {
        match serde_json::to_string(&commit.values) {
            Ok(values) => tracing::info!(row = commit.row, %values, "row committed"),
            Err(e) => tracing::info!(row = commit.row, error = %e, "row committed"),
        }
    }
}

/// Keeps every commit it receives. Available in tests and with the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub commits: Vec<Commit>,
}

#[cfg(any(test, feature = "test-util"))]
impl CommitSink for RecordingSink {
    fn commit(&mut self, commit: &Commit) {
        self.commits.push(commit.clone());
    }
}

impl<S: CommitSink + ?Sized> CommitSink for Box<S> {
    fn commit(&mut self, commit: &Commit) {
        (**self).commit(commit);
    }
}
