use tracing::info;

use crate::records::ComplaintRecord;
use crate::structures::{MinHeap, StructureError};

/// Owns open complaints; resolution always takes the most urgent one.
#[derive(Debug, Default)]
pub struct ComplaintService {
    open: MinHeap<ComplaintRecord>,
}

impl ComplaintService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, complaint: ComplaintRecord) -> ComplaintRecord {
        info!(
            flat = %complaint.flat,
            priority = complaint.priority,
            "complaint registered"
        );
        self.open.push(complaint.priority, complaint.clone());
        complaint
    }

    pub fn resolve(&mut self) -> Result<ComplaintRecord, StructureError> {
        let complaint = self.open.pop_min().ok_or(StructureError::Empty {
            structure: "complaint queue",
        })?;
        info!(
            flat = %complaint.flat,
            priority = complaint.priority,
            remaining = self.open.len(),
            "complaint resolved"
        );
        Ok(complaint)
    }

    pub fn count(&self) -> usize {
        self.open.len()
    }

    /// Open complaints, most urgent first.
    pub fn list(&self) -> Vec<ComplaintRecord> {
        self.open.ordered().into_iter().cloned().collect()
    }

    pub fn list_for_flat(&self, flat: &str) -> Vec<ComplaintRecord> {
        self.open
            .ordered()
            .into_iter()
            .filter(|complaint| complaint.flat == flat)
            .cloned()
            .collect()
    }

    pub fn dump(&self) -> Vec<ComplaintRecord> {
        self.list()
    }

    /// Replace all open complaints. Equal priorities keep the order they are given in.
    pub fn load(&mut self, complaints: Vec<ComplaintRecord>) {
        let mut open = MinHeap::new();
        for complaint in complaints {
            open.push(complaint.priority, complaint);
        }
        self.open = open;
    }
}
