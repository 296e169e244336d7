pub mod building;
pub mod complaints;
pub mod facilities;
pub mod residents;
pub mod visitors;

pub use building::{BuildingDirectory, BuildingSnapshot};
pub use complaints::ComplaintService;
pub use facilities::{FacilityConnections, FacilityLink, FacilityMap, FacilitySnapshot};
pub use residents::{ResidentService, ResidentSnapshot, ResidentSortKey};
pub use visitors::VisitorService;
