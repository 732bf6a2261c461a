use super::extract::extract_references;
use crate::error::{FieldsmithError, FieldsmithResult};
use crate::types::{FieldTable, ROW_TOKEN_OFFSET};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Dependency graph over the rows of a field table.
///
/// Nodes are row indices; an edge dependency → dependent exists when the
/// dependent row's formula or display condition references the dependency
/// row through a positional placeholder.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<usize, ()>,
    nodes: Vec<NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph for a table.
    ///
    /// Every row is added as a node even when it references nothing, so
    /// the scheduler still visits it. A reference that falls outside the
    /// table is rejected here, before any remote call can happen.
    pub fn build(table: &FieldTable) -> FieldsmithResult<Self> {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..table.rows.len()).map(|i| graph.add_node(i)).collect();

        for row in &table.rows {
            let mut references = extract_references(row.formula.as_deref());
            for reference in extract_references(row.display_condition.as_deref()) {
                if !references.contains(&reference) {
                    references.push(reference);
                }
            }

            for reference in references {
                let dependency = usize::try_from(reference)
                    .ok()
                    .filter(|&index| index < table.rows.len())
                    .ok_or_else(|| {
                        FieldsmithError::MalformedReference(format!(
                            "row {} ({}) references {{{}}}, which names no row of the table",
                            row.index,
                            row.label,
                            reference + ROW_TOKEN_OFFSET
                        ))
                    })?;
                graph.add_edge(nodes[dependency], nodes[row.index], ());
            }
        }

        Ok(Self { graph, nodes })
    }

    /// Row indices this row depends on, ascending.
    pub fn dependencies_of(&self, row: usize) -> Vec<usize> {
        let mut dependencies: Vec<usize> = self
            .graph
            .neighbors_directed(self.nodes[row], Direction::Incoming)
            .map(|node| self.graph[node])
            .collect();
        dependencies.sort_unstable();
        dependencies
    }

    /// Creation order: every dependency strictly before its dependents.
    ///
    /// Kahn's algorithm with a min-heap ready queue, so ties among
    /// independent rows break by ascending row index and the same input
    /// always schedules the same way.
    ///
    /// A cycle (a self-reference is the minimal case) means no valid
    /// order exists; the error names the rows left unscheduled, which
    /// always include the cycle members.
    pub fn schedule(&self) -> FieldsmithResult<Vec<usize>> {
        let mut in_degree: Vec<usize> = self
            .nodes
            .iter()
            .map(|&node| self.graph.neighbors_directed(node, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(row, _)| Reverse(row))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(row)) = ready.pop() {
            order.push(row);
            for successor in self
                .graph
                .neighbors_directed(self.nodes[row], Direction::Outgoing)
            {
                let successor_row = self.graph[successor];
                in_degree[successor_row] -= 1;
                if in_degree[successor_row] == 0 {
                    ready.push(Reverse(successor_row));
                }
            }
        }

        if order.len() < self.nodes.len() {
            let stuck: Vec<usize> = in_degree
                .iter()
                .enumerate()
                .filter(|(_, &degree)| degree > 0)
                .map(|(row, _)| row)
                .collect();
            return Err(FieldsmithError::DependencyCycle(format!(
                "rows {stuck:?} form a reference cycle and cannot be ordered"
            )));
        }

        Ok(order)
    }
}
