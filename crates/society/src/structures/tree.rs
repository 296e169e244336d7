//! Society → Tower → Floor → Flat containment hierarchy.
//!
//! Nodes are stored in an arena; each node keeps its parent index and its ordered child
//! indices. Node 0 is always the society root. Mutators only ever attach new leaves below an
//! existing node of the level above, so every flat has exactly one floor parent, every floor
//! exactly one tower parent, and cycles cannot be formed.

use super::error::StructureError;
use serde::{Deserialize, Serialize};

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TowerHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloorHandle(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Society { name: String },
    Tower { name: String },
    Floor { number: u32 },
    Flat { number: String },
}

#[derive(Debug, Clone)]
struct TreeNode {
    kind: NodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Where a flat sits inside the society.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatLocation {
    pub tower: String,
    pub floor: u32,
    pub flat: String,
}

/// Depth-first serialization of one tower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerView {
    pub tower: String,
    pub floors: Vec<FloorView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorView {
    pub floor: u32,
    pub flats: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ContainmentTree {
    nodes: Vec<TreeNode>,
}

impl ContainmentTree {
    pub fn new(society: impl Into<String>) -> Self {
        Self {
            nodes: vec![TreeNode {
                kind: NodeKind::Society {
                    name: society.into(),
                },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn society(&self) -> &str {
        match &self.nodes[ROOT].kind {
            NodeKind::Society { name } => name,
            _ => "",
        }
    }

    pub fn add_tower(&mut self, name: impl Into<String>) -> TowerHandle {
        TowerHandle(self.attach(ROOT, NodeKind::Tower { name: name.into() }))
    }

    pub fn add_floor(
        &mut self,
        tower: TowerHandle,
        number: u32,
    ) -> Result<FloorHandle, StructureError> {
        self.tower_name(tower)?;
        Ok(FloorHandle(self.attach(tower.0, NodeKind::Floor { number })))
    }

    /// Attach a flat below `floor`. Flat numbers are unique across the whole tree.
    pub fn add_flat(
        &mut self,
        floor: FloorHandle,
        number: impl Into<String>,
    ) -> Result<(), StructureError> {
        let number = number.into();
        if !matches!(
            self.nodes.get(floor.0).map(|node| &node.kind),
            Some(NodeKind::Floor { .. })
        ) {
            return Err(StructureError::not_found(format!("floor handle {}", floor.0)));
        }
        if self.search_flat(&number).is_some() {
            return Err(StructureError::duplicate(number));
        }

        self.attach(floor.0, NodeKind::Flat { number });
        Ok(())
    }

    /// Depth-first walk in insertion order: towers, then their floors, then their flats.
    pub fn search_flat(&self, number: &str) -> Option<FlatLocation> {
        for &tower in &self.nodes[ROOT].children {
            let NodeKind::Tower { name } = &self.nodes[tower].kind else {
                continue;
            };
            for &floor in &self.nodes[tower].children {
                let NodeKind::Floor { number: floor_number } = self.nodes[floor].kind else {
                    continue;
                };
                for &flat in &self.nodes[floor].children {
                    if let NodeKind::Flat { number: flat_number } = &self.nodes[flat].kind {
                        if flat_number == number {
                            return Some(FlatLocation {
                                tower: name.clone(),
                                floor: floor_number,
                                flat: flat_number.clone(),
                            });
                        }
                    }
                }
            }
        }
        None
    }

    /// Counts flats by walking every tower and floor. Nothing is cached.
    pub fn total_flats(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![ROOT];
        while let Some(index) = pending.pop() {
            let node = &self.nodes[index];
            if matches!(node.kind, NodeKind::Flat { .. }) {
                total += 1;
            }
            pending.extend(node.children.iter().copied());
        }
        total
    }

    pub fn towers(&self) -> Vec<TowerHandle> {
        self.nodes[ROOT]
            .children
            .iter()
            .copied()
            .map(TowerHandle)
            .collect()
    }

    /// First tower registered under `name`.
    pub fn find_tower(&self, name: &str) -> Option<TowerHandle> {
        self.nodes[ROOT]
            .children
            .iter()
            .copied()
            .find(|&index| matches!(&self.nodes[index].kind, NodeKind::Tower { name: n } if n == name))
            .map(TowerHandle)
    }

    pub fn find_floor(&self, tower: TowerHandle, number: u32) -> Option<FloorHandle> {
        self.tower_name(tower).ok()?;
        self.nodes[tower.0]
            .children
            .iter()
            .copied()
            .find(|&index| matches!(self.nodes[index].kind, NodeKind::Floor { number: n } if n == number))
            .map(FloorHandle)
    }

    pub fn tower_structure(&self, tower: TowerHandle) -> Result<TowerView, StructureError> {
        let name = self.tower_name(tower)?.to_string();
        let floors = self.nodes[tower.0]
            .children
            .iter()
            .filter_map(|&floor| match self.nodes[floor].kind {
                NodeKind::Floor { number } => Some(FloorView {
                    floor: number,
                    flats: self.flat_numbers(floor),
                }),
                _ => None,
            })
            .collect();

        Ok(TowerView {
            tower: name,
            floors,
        })
    }

    /// Every tower in insertion order.
    pub fn structure(&self) -> Vec<TowerView> {
        self.towers()
            .into_iter()
            .filter_map(|tower| self.tower_structure(tower).ok())
            .collect()
    }

    /// Rebuild a tree from serialized towers, enforcing the same rules as the mutators.
    pub fn load(society: impl Into<String>, towers: &[TowerView]) -> Result<Self, StructureError> {
        let mut tree = Self::new(society);
        for view in towers {
            let tower = tree.add_tower(view.tower.clone());
            for floor_view in &view.floors {
                let floor = tree.add_floor(tower, floor_view.floor)?;
                for flat in &floor_view.flats {
                    tree.add_flat(floor, flat.clone())?;
                }
            }
        }
        Ok(tree)
    }

    fn attach(&mut self, parent: usize, kind: NodeKind) -> usize {
        let index = self.nodes.len();
        self.nodes.push(TreeNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        index
    }

    fn tower_name(&self, tower: TowerHandle) -> Result<&str, StructureError> {
        match self.nodes.get(tower.0) {
            Some(TreeNode {
                kind: NodeKind::Tower { name },
                parent: Some(ROOT),
                ..
            }) => Ok(name),
            _ => Err(StructureError::not_found(format!("tower handle {}", tower.0))),
        }
    }

    fn flat_numbers(&self, floor: usize) -> Vec<String> {
        self.nodes[floor]
            .children
            .iter()
            .filter_map(|&flat| match &self.nodes[flat].kind {
                NodeKind::Flat { number } => Some(number.clone()),
                _ => None,
            })
            .collect()
    }

    #[cfg(test)]
    fn parent_chain(&self, number: &str) -> Vec<usize> {
        let Some(start) = self
            .nodes
            .iter()
            .position(|node| matches!(&node.kind, NodeKind::Flat { number: n } if n == number))
        else {
            return Vec::new();
        };
        let mut chain = vec![start];
        let mut cursor = start;
        while let Some(parent) = self.nodes[cursor].parent {
            chain.push(parent);
            cursor = parent;
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_towers() -> ContainmentTree {
        let mut tree = ContainmentTree::new("Green Valley Apartments");
        for prefix in ["A", "B"] {
            let tower = tree.add_tower(format!("Tower {prefix}"));
            for floor_number in 1..=3 {
                let floor = tree.add_floor(tower, floor_number).expect("tower handle");
                for flat in 1..=2 {
                    tree.add_flat(floor, format!("{prefix}-{floor_number}0{flat}"))
                        .expect("unique flat");
                }
            }
        }
        tree
    }

    #[test]
    fn search_returns_full_ancestry() {
        let tree = two_towers();
        assert_eq!(
            tree.search_flat("B-302"),
            Some(FlatLocation {
                tower: "Tower B".to_string(),
                floor: 3,
                flat: "B-302".to_string(),
            })
        );
        assert_eq!(tree.search_flat("C-101"), None);
    }

    #[test]
    fn every_flat_has_floor_tower_root_ancestry() {
        let tree = two_towers();
        let chain = tree.parent_chain("A-201");
        assert_eq!(chain.len(), 4);
        assert_eq!(*chain.last().expect("root"), ROOT);
        assert!(matches!(tree.nodes[chain[1]].kind, NodeKind::Floor { number: 2 }));
        assert!(matches!(&tree.nodes[chain[2]].kind, NodeKind::Tower { name } if name == "Tower A"));
    }

    #[test]
    fn flat_numbers_are_globally_unique() {
        let mut tree = two_towers();
        let tower_b = tree.find_tower("Tower B").expect("tower b");
        let floor = tree.find_floor(tower_b, 1).expect("floor 1");

        assert_eq!(
            tree.add_flat(floor, "A-101"),
            Err(StructureError::DuplicateKey {
                key: "A-101".to_string()
            })
        );
        assert_eq!(tree.total_flats(), 12);
    }

    #[test]
    fn total_flats_tracks_successful_additions() {
        let mut tree = ContainmentTree::new("Society");
        assert_eq!(tree.total_flats(), 0);
        let tower = tree.add_tower("Tower C");
        let floor = tree.add_floor(tower, 1).expect("floor");
        tree.add_flat(floor, "C-101").expect("flat");
        tree.add_flat(floor, "C-102").expect("flat");
        assert!(tree.add_flat(floor, "C-101").is_err());
        assert_eq!(tree.total_flats(), 2);
    }

    #[test]
    fn handles_of_the_wrong_level_are_rejected() {
        let mut tree = two_towers();
        let tower = tree.find_tower("Tower A").expect("tower");
        let floor = tree.find_floor(tower, 1).expect("floor");

        assert!(matches!(
            tree.add_floor(TowerHandle(floor.0), 9),
            Err(StructureError::NotFound { .. })
        ));
        assert!(matches!(
            tree.add_flat(FloorHandle(tower.0), "A-999"),
            Err(StructureError::NotFound { .. })
        ));
        assert!(matches!(
            tree.add_flat(FloorHandle(10_000), "A-999"),
            Err(StructureError::NotFound { .. })
        ));
        assert_eq!(tree.find_floor(TowerHandle(floor.0), 1), None);
        assert_eq!(tree.find_floor(TowerHandle(ROOT), 1), None);
        assert_eq!(tree.find_floor(TowerHandle(10_000), 1), None);
    }

    #[test]
    fn structure_serializes_in_insertion_order() {
        let tree = two_towers();
        let structure = tree.structure();

        assert_eq!(structure.len(), 2);
        assert_eq!(structure[0].tower, "Tower A");
        assert_eq!(structure[0].floors[0].flats, vec!["A-101", "A-102"]);
        assert_eq!(structure[1].floors[2].floor, 3);

        let reloaded = ContainmentTree::load(tree.society(), &structure).expect("valid structure");
        assert_eq!(reloaded.structure(), structure);
        assert_eq!(reloaded.total_flats(), 12);
    }
}
