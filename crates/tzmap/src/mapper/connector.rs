use log::debug;

use tzmap_core::otm::Dataflow;

use crate::{deterministic::deterministic_uuid, diagram::Diagram};

/// Maps every surviving edge to a dataflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectorMapper;

impl ConnectorMapper {
    /// Unnamed edges get a name derived from their id, stable across runs.
    pub fn map(&self, diagram: &Diagram) -> Vec<Dataflow> {
        let dataflows: Vec<Dataflow> = diagram
            .edges()
            .iter()
            .map(|edge| Dataflow {
                id: edge.id().to_string(),
                name: edge
                    .name()
                    .map_or_else(|| deterministic_uuid(edge.id()), str::to_string),
                source_id: edge.from_id().to_string(),
                destination_id: edge.to_id().to_string(),
                bidirectional: edge.is_bidirectional().then_some(true),
            })
            .collect();

        debug!(dataflows_count = dataflows.len(); "Dataflows mapped");
        dataflows
    }
}
