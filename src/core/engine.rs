use super::graph::DependencyGraph;
use super::rewrite;
use crate::client::FieldBackend;
use crate::error::{FieldsmithError, FieldsmithResult};
use crate::types::{FieldRow, FieldTable};
use std::thread;
use std::time::Duration;

/// Wait between a failed attempt and its single retry.
const RETRY_DELAY: Duration = Duration::from_millis(750);

/// Lifecycle of one row across a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Pending,
    Created(String),
    Updated(String),
    CreateFailed(String),
    UpdateFailed(String),
    SkippedUnresolved(String),
}

impl RowState {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RowState::CreateFailed(_) | RowState::UpdateFailed(_) | RowState::SkippedUnresolved(_)
        )
    }
}

/// Per-row result reported at the end of a run.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub row_index: usize,
    pub label: String,
    pub state: RowState,
}

/// Summary of one materialization run.
///
/// Partial completion is an accepted outcome: failed rows are reported,
/// and fields already created stay in place.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<RowOutcome>,
}

impl RunReport {
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| {
                matches!(outcome.state, RowState::Created(_) | RowState::Updated(_))
            })
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state.is_failure())
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

/// Drives create/update calls against a [`FieldBackend`] in dependency
/// order, one row at a time.
///
/// Strictly sequential by design: remote placement is order-sensitive
/// (inserting a field shifts the positions of fields inserted after it in
/// the same section), so rows are never materialized concurrently.
pub struct Engine<B: FieldBackend> {
    backend: B,
}

impl<B: FieldBackend> Engine<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Single-pass run: create rows in dependency order, rewriting
    /// placeholders as identifiers come back.
    ///
    /// Structural errors (malformed references, cycles) abort before the
    /// first remote call. Remote failures are row-local: the schedule
    /// keeps going, and a row depending on a failed row is skipped with
    /// an unresolved-dependency outcome instead of submitting a
    /// positional placeholder the remote system cannot interpret.
    pub fn run(&self, table: &mut FieldTable) -> FieldsmithResult<RunReport> {
        let graph = DependencyGraph::build(table)?;
        let order = graph.schedule()?;

        let mut report = RunReport::default();
        for row_index in order {
            let state = self.materialize(table, row_index);
            report.outcomes.push(RowOutcome {
                row_index,
                label: table.rows[row_index].label.clone(),
                state,
            });
        }

        report.outcomes.sort_by_key(|outcome| outcome.row_index);
        Ok(report)
    }

    /// Two-pass legacy mode: create every field first with its raw text,
    /// then update every field once all identifiers are known.
    ///
    /// Both passes walk in table order; by the update pass all
    /// identifiers exist and cross-reference order no longer matters.
    /// Every field is written twice, which is the price of supporting
    /// tables whose references cannot all be extracted up front.
    pub fn run_two_pass(&self, table: &mut FieldTable) -> FieldsmithResult<RunReport> {
        // Structural validation still gates the run: a cycle or an
        // out-of-range reference aborts before any remote call.
        DependencyGraph::build(table)?.schedule()?;

        let mut report = RunReport::default();
        for row_index in 0..table.rows.len() {
            let state = match self.create_with_retry(&table.rows[row_index]) {
                Ok(field_name) => {
                    rewrite::resolve_row(table, row_index, &field_name);
                    RowState::Created(field_name)
                }
                Err(error) => RowState::CreateFailed(error.to_string()),
            };
            report.outcomes.push(RowOutcome {
                row_index,
                label: table.rows[row_index].label.clone(),
                state,
            });
        }

        for outcome in &mut report.outcomes {
            let RowState::Created(field_name) = outcome.state.clone() else {
                continue;
            };

            let pending = rewrite::unresolved_references(table, outcome.row_index);
            if !pending.is_empty() {
                let message = format!(
                    "row {} ({}) was created but still references row(s) {:?}, which did not materialize",
                    outcome.row_index, outcome.label, pending
                );
                outcome.state = RowState::SkippedUnresolved(message);
                continue;
            }

            outcome.state = match self.update_with_retry(&field_name, &table.rows[outcome.row_index])
            {
                Ok(()) => RowState::Updated(field_name),
                Err(error) => RowState::UpdateFailed(error.to_string()),
            };
        }

        Ok(report)
    }

    fn materialize(&self, table: &mut FieldTable, row_index: usize) -> RowState {
        let pending = rewrite::unresolved_references(table, row_index);
        if !pending.is_empty() {
            let error = FieldsmithError::UnresolvedDependency(format!(
                "row {} ({}) depends on row(s) {:?}, which did not materialize",
                row_index, table.rows[row_index].label, pending
            ));
            return RowState::SkippedUnresolved(error.to_string());
        }

        match self.create_with_retry(&table.rows[row_index]) {
            Ok(field_name) => {
                rewrite::resolve_row(table, row_index, &field_name);
                RowState::Created(field_name)
            }
            Err(error) => RowState::CreateFailed(error.to_string()),
        }
    }

    /// One deterministic retry on transport-level failure. Remote
    /// rejections are not retried; a second transport failure escalates
    /// to a remote-call failure.
    fn create_with_retry(&self, row: &FieldRow) -> FieldsmithResult<String> {
        match self.backend.create_field(row) {
            Err(FieldsmithError::Transport(_)) => {
                thread::sleep(RETRY_DELAY);
                self.backend.create_field(row).map_err(escalate_transport)
            }
            result => result,
        }
    }

    fn update_with_retry(&self, field_name: &str, row: &FieldRow) -> FieldsmithResult<()> {
        match self.backend.update_field(field_name, row) {
            Err(FieldsmithError::Transport(_)) => {
                thread::sleep(RETRY_DELAY);
                self.backend
                    .update_field(field_name, row)
                    .map_err(escalate_transport)
            }
            result => result,
        }
    }
}

fn escalate_transport(error: FieldsmithError) -> FieldsmithError {
    match error {
        FieldsmithError::Transport(message) => {
            FieldsmithError::RemoteCall(format!("transport failed twice: {message}"))
        }
        other => other,
    }
}
