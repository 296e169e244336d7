//! Records for a residential society: residents and their bills, the visitor queue, prioritized
//! complaints, the facility map and the tower/floor/flat directory.

pub mod access;
pub mod config;
pub mod context;
pub mod error;
pub mod records;
pub mod roster;
pub mod router;
pub mod seed;
pub mod services;
pub mod structures;
pub mod telemetry;

pub use context::{DashboardStats, SocietyContext, SocietySnapshot};
pub use router::society_router;
