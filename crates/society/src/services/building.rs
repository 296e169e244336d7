use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::structures::{
    ContainmentTree, FlatLocation, FloorHandle, StructureError, TowerHandle, TowerView,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    pub society: String,
    pub towers: Vec<TowerView>,
}

/// The society's towers, floors and flats.
#[derive(Debug)]
pub struct BuildingDirectory {
    tree: ContainmentTree,
}

impl BuildingDirectory {
    pub fn new(society: impl Into<String>) -> Self {
        Self {
            tree: ContainmentTree::new(society),
        }
    }

    pub fn society(&self) -> &str {
        self.tree.society()
    }

    pub fn add_tower(&mut self, name: impl Into<String>) -> TowerHandle {
        self.tree.add_tower(name)
    }

    pub fn add_floor(&mut self, tower: TowerHandle, number: u32) -> Result<FloorHandle, StructureError> {
        self.tree.add_floor(tower, number)
    }

    pub fn add_flat(
        &mut self,
        floor: FloorHandle,
        flat: impl Into<String>,
    ) -> Result<(), StructureError> {
        let flat = flat.into();
        self.tree.add_flat(floor, flat.clone())?;
        debug!(%flat, "flat registered");
        Ok(())
    }

    /// Add a flat by tower name and floor number, creating the tower and floor when missing.
    pub fn ensure_flat(
        &mut self,
        tower: &str,
        floor: u32,
        flat: impl Into<String>,
    ) -> Result<(), StructureError> {
        let tower = match self.tree.find_tower(tower) {
            Some(handle) => handle,
            None => self.tree.add_tower(tower),
        };
        let floor = match self.tree.find_floor(tower, floor) {
            Some(handle) => handle,
            None => self.tree.add_floor(tower, floor)?,
        };
        self.add_flat(floor, flat)
    }

    pub fn search(&self, flat: &str) -> Result<FlatLocation, StructureError> {
        self.tree
            .search_flat(flat)
            .ok_or_else(|| StructureError::not_found(flat))
    }

    pub fn structure(&self) -> Vec<TowerView> {
        self.tree.structure()
    }

    pub fn tower_structure(&self, tower: &str) -> Result<TowerView, StructureError> {
        let handle = self
            .tree
            .find_tower(tower)
            .ok_or_else(|| StructureError::not_found(tower))?;
        self.tree.tower_structure(handle)
    }

    pub fn total_flats(&self) -> usize {
        self.tree.total_flats()
    }

    pub fn dump(&self) -> BuildingSnapshot {
        BuildingSnapshot {
            society: self.tree.society().to_string(),
            towers: self.tree.structure(),
        }
    }

    pub fn load(&mut self, snapshot: BuildingSnapshot) -> Result<(), StructureError> {
        self.tree = ContainmentTree::load(snapshot.society, &snapshot.towers)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_flat_reuses_existing_tower_and_floor() {
        let mut building = BuildingDirectory::new("Society");
        building.ensure_flat("Tower A", 1, "A-101").expect("flat");
        building.ensure_flat("Tower A", 1, "A-102").expect("flat");
        building.ensure_flat("Tower A", 2, "A-201").expect("flat");

        let structure = building.structure();
        assert_eq!(structure.len(), 1);
        assert_eq!(structure[0].floors.len(), 2);
        assert_eq!(structure[0].floors[0].flats, vec!["A-101", "A-102"]);
        assert_eq!(building.total_flats(), 3);
    }

    #[test]
    fn search_reports_missing_flats() {
        let mut building = BuildingDirectory::new("Society");
        building.ensure_flat("Tower A", 1, "A-101").expect("flat");

        assert_eq!(building.search("A-101").expect("present").tower, "Tower A");
        assert_eq!(
            building.search("A-999"),
            Err(StructureError::NotFound {
                key: "A-999".to_string()
            })
        );
        assert!(matches!(
            building.tower_structure("Tower Z"),
            Err(StructureError::NotFound { .. })
        ));
    }

    #[test]
    fn failed_load_keeps_current_tree() {
        let mut building = BuildingDirectory::new("Society");
        building.ensure_flat("Tower A", 1, "A-101").expect("flat");

        let duplicate = BuildingSnapshot {
            society: "Other".to_string(),
            towers: vec![TowerView {
                tower: "Tower X".to_string(),
                floors: vec![crate::structures::FloorView {
                    floor: 1,
                    flats: vec!["X-1".to_string(), "X-1".to_string()],
                }],
            }],
        };

        assert!(building.load(duplicate).is_err());
        assert_eq!(building.society(), "Society");
        assert_eq!(building.total_flats(), 1);
    }
}
