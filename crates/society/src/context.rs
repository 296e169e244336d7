use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::records::{ComplaintRecord, VisitorRecord};
use crate::services::{
    BuildingDirectory, BuildingSnapshot, ComplaintService, FacilityMap, FacilitySnapshot,
    ResidentService, ResidentSnapshot, VisitorService,
};
use crate::structures::StructureError;

/// Every service the society runs, each behind its own lock.
///
/// Built once at start-up and shared through `Arc`. A request holds at most one lock at a time,
/// so writers to different structures never wait on each other.
#[derive(Debug)]
pub struct SocietyContext {
    residents: Mutex<ResidentService>,
    complaints: Mutex<ComplaintService>,
    visitors: Mutex<VisitorService>,
    facilities: Mutex<FacilityMap>,
    building: Mutex<BuildingDirectory>,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_residents: usize,
    pub total_visitors: usize,
    pub active_complaints: usize,
    pub total_billing: i64,
    pub total_flats: usize,
    pub total_facilities: usize,
}

/// Full bulk export of every structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocietySnapshot {
    pub residents: ResidentSnapshot,
    pub visitors: Vec<VisitorRecord>,
    pub complaints: Vec<ComplaintRecord>,
    pub facilities: FacilitySnapshot,
    pub building: BuildingSnapshot,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Mutators validate before touching state, so a poisoned lock still guards consistent data.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SocietyContext {
    pub fn new(society: impl Into<String>) -> Self {
        Self {
            residents: Mutex::new(ResidentService::new()),
            complaints: Mutex::new(ComplaintService::new()),
            visitors: Mutex::new(VisitorService::new()),
            facilities: Mutex::new(FacilityMap::new()),
            building: Mutex::new(BuildingDirectory::new(society)),
        }
    }

    pub fn residents(&self) -> MutexGuard<'_, ResidentService> {
        lock(&self.residents)
    }

    pub fn complaints(&self) -> MutexGuard<'_, ComplaintService> {
        lock(&self.complaints)
    }

    pub fn visitors(&self) -> MutexGuard<'_, VisitorService> {
        lock(&self.visitors)
    }

    pub fn facilities(&self) -> MutexGuard<'_, FacilityMap> {
        lock(&self.facilities)
    }

    pub fn building(&self) -> MutexGuard<'_, BuildingDirectory> {
        lock(&self.building)
    }

    pub fn stats(&self) -> DashboardStats {
        let (total_residents, total_billing) = {
            let residents = self.residents();
            (residents.count(), residents.total_pending())
        };

        DashboardStats {
            total_residents,
            total_billing,
            total_visitors: self.visitors().count(),
            active_complaints: self.complaints().count(),
            total_flats: self.building().total_flats(),
            total_facilities: self.facilities().count(),
        }
    }

    pub fn dump(&self) -> SocietySnapshot {
        SocietySnapshot {
            residents: self.residents().dump(),
            visitors: self.visitors().dump(),
            complaints: self.complaints().dump(),
            facilities: self.facilities().dump(),
            building: self.building().dump(),
        }
    }

    /// Restore every structure from a snapshot.
    ///
    /// The snapshot is staged into fresh services first; a rejected snapshot changes nothing.
    pub fn restore(&self, snapshot: SocietySnapshot) -> Result<(), StructureError> {
        let mut residents = ResidentService::new();
        residents.load(snapshot.residents)?;
        let mut facilities = FacilityMap::new();
        facilities.load(snapshot.facilities)?;
        let mut building = BuildingDirectory::new(snapshot.building.society.clone());
        building.load(snapshot.building)?;
        let mut visitors = VisitorService::new();
        visitors.load(snapshot.visitors);
        let mut complaints = ComplaintService::new();
        complaints.load(snapshot.complaints);

        *self.residents() = residents;
        *self.facilities() = facilities;
        *self.building() = building;
        *self.visitors() = visitors;
        *self.complaints() = complaints;
        Ok(())
    }
}
