//! Undirected, unweighted adjacency table.

use super::error::StructureError;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vertex. Returns `false` when the label was already present.
    pub fn add_vertex(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.index.contains_key(&label) {
            return false;
        }

        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label);
        self.adjacency.push(Vec::new());
        true
    }

    /// Connect two registered vertices in both directions. Repeated edges are ignored.
    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<(), StructureError> {
        let from = self.position(a)?;
        let to = self.position(b)?;

        if self.adjacency[from].contains(&to) {
            return Ok(());
        }

        self.adjacency[from].push(to);
        if from != to {
            self.adjacency[to].push(from);
        }
        self.edges.push((from, to));
        Ok(())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Labels in registration order.
    pub fn vertices(&self) -> Vec<&str> {
        self.labels.iter().map(String::as_str).collect()
    }

    /// Neighbours of `label` in edge-insertion order; empty for an isolated vertex.
    pub fn connections(&self, label: &str) -> Result<Vec<&str>, StructureError> {
        let position = self.position(label)?;
        Ok(self.adjacency[position]
            .iter()
            .map(|neighbour| self.labels[*neighbour].as_str())
            .collect())
    }

    /// Every edge once, in the order it was first added.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|(a, b)| (self.labels[*a].as_str(), self.labels[*b].as_str()))
            .collect()
    }

    /// Fewest-hop route between two vertices using breadth-first search.
    ///
    /// Neighbours are expanded in edge-insertion order, so among routes of equal length the
    /// first one discovered wins. Returns `None` when the vertices are not connected.
    pub fn shortest_route(&self, from: &str, to: &str) -> Result<Option<Vec<&str>>, StructureError> {
        let start = self.position(from)?;
        let goal = self.position(to)?;

        let mut parent: Vec<Option<usize>> = vec![None; self.labels.len()];
        let mut visited = vec![false; self.labels.len()];
        let mut frontier = VecDeque::from([start]);
        visited[start] = true;

        while let Some(current) = frontier.pop_front() {
            if current == goal {
                let mut route = vec![self.labels[goal].as_str()];
                let mut cursor = goal;
                while let Some(previous) = parent[cursor] {
                    route.push(self.labels[previous].as_str());
                    cursor = previous;
                }
                route.reverse();
                return Ok(Some(route));
            }

            for &neighbour in &self.adjacency[current] {
                if !visited[neighbour] {
                    visited[neighbour] = true;
                    parent[neighbour] = Some(current);
                    frontier.push_back(neighbour);
                }
            }
        }

        Ok(None)
    }

    fn position(&self, label: &str) -> Result<usize, StructureError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| StructureError::unknown_vertex(label))
    }
}
