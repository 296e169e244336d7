use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::structures::{AdjacencyGraph, StructureError};

/// One row of the facility adjacency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityConnections {
    pub facility: String,
    pub connections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityLink {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySnapshot {
    pub facilities: Vec<String>,
    pub links: Vec<FacilityLink>,
}

/// Shared facilities and which of them are adjacent to each other.
#[derive(Debug, Default)]
pub struct FacilityMap {
    graph: AdjacencyGraph,
}

impl FacilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_facility(&mut self, name: impl Into<String>) -> bool {
        self.graph.add_vertex(name)
    }

    pub fn connect(&mut self, a: &str, b: &str) -> Result<(), StructureError> {
        self.graph.add_edge(a, b)?;
        debug!(%a, %b, "facilities connected");
        Ok(())
    }

    pub fn facilities(&self) -> Vec<String> {
        self.graph.vertices().into_iter().map(str::to_string).collect()
    }

    pub fn connections(&self, facility: &str) -> Result<Vec<String>, StructureError> {
        Ok(self
            .graph
            .connections(facility)?
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn connection_table(&self) -> Vec<FacilityConnections> {
        self.graph
            .vertices()
            .into_iter()
            .map(|facility| FacilityConnections {
                facility: facility.to_string(),
                connections: self
                    .graph
                    .connections(facility)
                    .map(|found| found.into_iter().map(str::to_string).collect())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Fewest-hop walk between two facilities, if one exists.
    pub fn route(&self, from: &str, to: &str) -> Result<Option<Vec<String>>, StructureError> {
        Ok(self
            .graph
            .shortest_route(from, to)?
            .map(|route| route.into_iter().map(str::to_string).collect()))
    }

    pub fn count(&self) -> usize {
        self.graph.vertices().len()
    }

    pub fn dump(&self) -> FacilitySnapshot {
        FacilitySnapshot {
            facilities: self.facilities(),
            links: self
                .graph
                .edges()
                .into_iter()
                .map(|(from, to)| FacilityLink {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
        }
    }

    pub fn load(&mut self, snapshot: FacilitySnapshot) -> Result<(), StructureError> {
        let mut graph = AdjacencyGraph::new();
        for facility in snapshot.facilities {
            graph.add_vertex(facility);
        }
        for link in &snapshot.links {
            graph.add_edge(&link.from, &link.to)?;
        }
        self.graph = graph;
        Ok(())
    }
}
