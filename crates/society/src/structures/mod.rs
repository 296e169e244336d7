//! In-memory record structures. None of them synchronizes internally.

pub mod error;
pub mod graph;
pub mod heap;
pub mod linked_list;
pub mod queue;
pub mod search;
pub mod sort;
pub mod stack;
pub mod tree;

pub use error::StructureError;
pub use graph::AdjacencyGraph;
pub use heap::MinHeap;
pub use linked_list::{Keyed, RecordList};
pub use queue::FifoQueue;
pub use stack::UndoStack;
pub use tree::{ContainmentTree, FlatLocation, FloorHandle, FloorView, TowerHandle, TowerView};
