//! Dependency graph and scheduling tests

use fieldsmith::core::DependencyGraph;
use fieldsmith::error::FieldsmithError;
use fieldsmith::types::{FieldRow, FieldTable, FieldType};
use pretty_assertions::assert_eq;

fn row(index: usize, formula: Option<&str>, condition: Option<&str>) -> FieldRow {
    FieldRow {
        index,
        section_index: 1,
        field_index: index as u32 + 1,
        field_type: if formula.is_some() {
            FieldType::CalculationsAndLogic
        } else {
            FieldType::TextInput
        },
        label: format!("field_{index}"),
        options: Vec::new(),
        formula: formula.map(String::from),
        display_condition: condition.map(String::from),
        allowed_file_types: Vec::new(),
        required: false,
        field_name: None,
    }
}

fn table(specs: &[(Option<&str>, Option<&str>)]) -> FieldTable {
    FieldTable::new(
        specs
            .iter()
            .enumerate()
            .map(|(index, (formula, condition))| row(index, *formula, *condition))
            .collect(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// SCHEDULING TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_chain_schedule() {
    // Row 1 references row 0 ({2}), row 2 references row 1 ({3})
    let table = table(&[(None, None), (Some("{2}+1"), None), (Some("{3}*2"), None)]);
    let graph = DependencyGraph::build(&table).unwrap();
    assert_eq!(graph.schedule().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_independent_rows_schedule_ascending() {
    let table = table(&[(None, None), (None, None), (None, None), (None, None)]);
    let graph = DependencyGraph::build(&table).unwrap();
    assert_eq!(graph.schedule().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_dependency_always_precedes_dependent() {
    // Diamond: rows 1 and 2 reference row 0, row 3 references rows 1 and 2
    let table = table(&[
        (None, None),
        (Some("{2}*2"), None),
        (Some("{2}+5"), None),
        (Some("{3}-{4}"), None),
    ]);
    let graph = DependencyGraph::build(&table).unwrap();
    let order = graph.schedule().unwrap();

    let position = |target: usize| order.iter().position(|&row| row == target).unwrap();
    for (dependent, dependencies) in [(1, vec![0]), (2, vec![0]), (3, vec![1, 2])] {
        for dependency in dependencies {
            assert!(
                position(dependency) < position(dependent),
                "row {dependency} must be created before row {dependent}, got {order:?}"
            );
        }
    }
}

#[test]
fn test_schedule_is_reproducible() {
    let table = table(&[
        (None, None),
        (Some("{2}"), None),
        (None, None),
        (Some("{4}+{2}"), None),
    ]);
    let graph = DependencyGraph::build(&table).unwrap();
    assert_eq!(graph.schedule().unwrap(), graph.schedule().unwrap());
}

#[test]
fn test_reference_in_display_condition_creates_edge() {
    // Row 1 has no formula, but its display condition references row 0
    let table = table(&[(None, None), (None, Some("{2} > 100"))]);
    let graph = DependencyGraph::build(&table).unwrap();

    assert_eq!(graph.dependencies_of(1), vec![0]);
    assert_eq!(graph.schedule().unwrap(), vec![0, 1]);
}

#[test]
fn test_dependency_free_rows_are_still_scheduled() {
    let table = table(&[(None, None), (Some("{2}"), None), (None, None)]);
    let graph = DependencyGraph::build(&table).unwrap();
    let order = graph.schedule().unwrap();
    assert_eq!(order.len(), 3);
    assert!(order.contains(&2));
}

// ═══════════════════════════════════════════════════════════════════════════
// CYCLE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_mutual_reference_is_a_cycle() {
    // Row 0 references row 1 ({3}) and row 1 references row 0 ({2})
    let table = table(&[(Some("{3}"), None), (Some("{2}"), None)]);
    let graph = DependencyGraph::build(&table).unwrap();

    match graph.schedule() {
        Err(FieldsmithError::DependencyCycle(message)) => {
            assert!(message.contains('0') && message.contains('1'));
        }
        other => panic!("expected a dependency cycle, got {other:?}"),
    }
}

#[test]
fn test_self_reference_is_a_cycle() {
    // Row 1's token is {3}; referencing it from its own formula is the
    // minimal cycle
    let table = table(&[(None, None), (Some("{3}*2"), None)]);
    let graph = DependencyGraph::build(&table).unwrap();
    assert!(matches!(
        graph.schedule(),
        Err(FieldsmithError::DependencyCycle(_))
    ));
}

#[test]
fn test_cycle_error_names_a_row_in_the_cycle() {
    // Rows 1 and 2 reference each other; row 0 is independent
    let table = table(&[(None, None), (Some("{4}"), None), (Some("{3}"), None)]);
    let graph = DependencyGraph::build(&table).unwrap();

    match graph.schedule() {
        Err(FieldsmithError::DependencyCycle(message)) => {
            assert!(message.contains('1') || message.contains('2'));
        }
        other => panic!("expected a dependency cycle, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MALFORMED REFERENCE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_out_of_range_reference_is_rejected_at_build() {
    let table = table(&[(None, None), (Some("{99}+1"), None)]);

    match DependencyGraph::build(&table) {
        Err(FieldsmithError::MalformedReference(message)) => {
            assert!(message.contains("{99}"));
            assert!(message.contains("field_1"));
        }
        other => panic!("expected a malformed reference, got {other:?}"),
    }
}

#[test]
fn test_token_below_offset_is_rejected_at_build() {
    // {1} would name row -1; no row can ever have that token
    let table = table(&[(Some("{1}"), None), (None, None)]);
    assert!(matches!(
        DependencyGraph::build(&table),
        Err(FieldsmithError::MalformedReference(_))
    ));
}

#[test]
fn test_out_of_range_reference_in_condition_is_rejected() {
    let table = table(&[(None, Some("{42} == 'yes'"))]);
    assert!(matches!(
        DependencyGraph::build(&table),
        Err(FieldsmithError::MalformedReference(_))
    ));
}
