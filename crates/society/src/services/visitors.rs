use tracing::info;

use crate::records::VisitorRecord;
use crate::structures::{FifoQueue, StructureError};

/// Visitors waiting at the gate, processed strictly in arrival order.
#[derive(Debug, Default)]
pub struct VisitorService {
    waiting: FifoQueue<VisitorRecord>,
}

impl VisitorService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, visitor: VisitorRecord) -> VisitorRecord {
        self.waiting.enqueue(visitor.clone());
        info!(flat = %visitor.flat, waiting = self.waiting.len(), "visitor checked in");
        visitor
    }

    pub fn dequeue(&mut self) -> Result<VisitorRecord, StructureError> {
        let visitor = self.waiting.dequeue().ok_or(StructureError::Empty {
            structure: "visitor queue",
        })?;
        info!(flat = %visitor.flat, waiting = self.waiting.len(), "visitor processed");
        Ok(visitor)
    }

    pub fn count(&self) -> usize {
        self.waiting.len()
    }

    /// Waiting visitors, earliest arrival first.
    pub fn list(&self) -> Vec<VisitorRecord> {
        self.waiting.iter().cloned().collect()
    }

    pub fn dump(&self) -> Vec<VisitorRecord> {
        self.list()
    }

    pub fn load(&mut self, visitors: Vec<VisitorRecord>) {
        let mut waiting = FifoQueue::new();
        for visitor in visitors {
            waiting.enqueue(visitor);
        }
        self.waiting = waiting;
    }
}
