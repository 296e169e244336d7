use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::records::{BillRecord, ResidentRecord};
use crate::structures::{RecordList, StructureError, UndoStack};

/// Keys a resident listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidentSortKey {
    Name,
    Flat,
    PendingBills,
}

impl ResidentSortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "flat" | "flat_number" => Some(Self::Flat),
            "pending_bills" | "bills" => Some(Self::PendingBills),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Flat => "flat",
            Self::PendingBills => "pending_bills",
        }
    }

    // Equal primary keys fall back to flat number, which is unique, so every ordering is total.
    fn compare(self, a: &ResidentRecord, b: &ResidentRecord) -> Ordering {
        let primary = match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Flat => Ordering::Equal,
            Self::PendingBills => a.pending_bills.cmp(&b.pending_bills),
        };
        primary.then_with(|| a.flat_number.cmp(&b.flat_number))
    }
}

/// Bulk export of residents and the billing history, oldest bill first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentSnapshot {
    pub residents: Vec<ResidentRecord>,
    pub bills: Vec<BillRecord>,
}

/// Owns resident records and the society-wide billing history.
#[derive(Debug, Default)]
pub struct ResidentService {
    residents: RecordList<ResidentRecord>,
    bills: UndoStack<BillRecord>,
}

impl ResidentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Residents in insertion order.
    pub fn list(&self) -> Vec<ResidentRecord> {
        self.residents.dump()
    }

    pub fn count(&self) -> usize {
        self.residents.len()
    }

    pub fn add(&mut self, record: ResidentRecord) -> Result<ResidentRecord, StructureError> {
        let flat = record.flat_number.clone();
        self.residents.insert(record.clone()).map_err(|err| {
            warn!(%flat, error = %err, "resident rejected");
            err
        })?;
        info!(%flat, "resident added");
        Ok(record)
    }

    /// Remove a resident together with the bills still outstanding against their flat.
    pub fn delete(&mut self, flat: &str) -> Result<ResidentRecord, StructureError> {
        let removed = self.residents.remove(flat)?;
        let before = self.bills.len();
        self.bills.retain(|bill| bill.flat != flat);
        info!(
            %flat,
            dropped_bills = before - self.bills.len(),
            "resident deleted"
        );
        Ok(removed)
    }

    /// Binary search over a flat-ordered snapshot.
    pub fn search(&self, flat: &str) -> Result<ResidentRecord, StructureError> {
        let found = self.residents.search_by_key(flat).cloned();
        debug!(%flat, found = found.is_ok(), "resident search");
        found
    }

    pub fn sort(&self, by: ResidentSortKey) -> Vec<ResidentRecord> {
        self.residents.sorted_view(|a, b| by.compare(a, b))
    }

    /// Outstanding dues across the society, pinned at the `i64` bounds.
    pub fn total_pending(&self) -> i64 {
        self.residents
            .iter()
            .fold(0i64, |total, resident| total.saturating_add(resident.pending_bills))
    }

    /// Raise a bill against an existing resident and record it for undo.
    pub fn add_bill(
        &mut self,
        flat: &str,
        amount: i64,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<BillRecord, StructureError> {
        let resident = self
            .residents
            .find_mut(flat)
            .ok_or_else(|| StructureError::not_found(flat))?;
        let Some(pending) = resident.pending_bills.checked_add(amount) else {
            warn!(%flat, amount, "bill rejected: balance out of range");
            return Err(StructureError::balance_overflow(flat));
        };
        resident.pending_bills = pending;

        let bill = BillRecord {
            flat: flat.to_string(),
            amount,
            description: description.into(),
            date,
        };
        self.bills.push(bill.clone());
        info!(%flat, amount, pending = resident.pending_bills, "bill added");
        Ok(bill)
    }

    /// Undo the most recent bill in the society and reverse its charge.
    ///
    /// Either the bill leaves the history and the balance is restored, or neither happens.
    pub fn undo_bill(&mut self) -> Result<BillRecord, StructureError> {
        let bill = self.bills.pop().ok_or(StructureError::Empty {
            structure: "billing history",
        })?;

        let Some(resident) = self.residents.find_mut(&bill.flat) else {
            let flat = bill.flat.clone();
            self.bills.push(bill);
            warn!(%flat, "bill kept: originating resident missing");
            return Err(StructureError::not_found(flat));
        };
        let Some(pending) = resident.pending_bills.checked_sub(bill.amount) else {
            let flat = bill.flat.clone();
            self.bills.push(bill);
            warn!(%flat, "bill kept: balance out of range");
            return Err(StructureError::balance_overflow(flat));
        };

        resident.pending_bills = pending;
        info!(flat = %bill.flat, amount = bill.amount, "bill undone");
        Ok(bill)
    }

    /// Billing history, oldest first.
    pub fn bills(&self) -> Vec<BillRecord> {
        self.bills.iter().cloned().collect()
    }

    pub fn bills_for(&self, flat: &str) -> Vec<BillRecord> {
        self.bills
            .iter()
            .filter(|bill| bill.flat == flat)
            .cloned()
            .collect()
    }

    pub fn dump(&self) -> ResidentSnapshot {
        ResidentSnapshot {
            residents: self.residents.dump(),
            bills: self.bills(),
        }
    }

    /// Replace all state. Rejected snapshots leave the current state untouched.
    pub fn load(&mut self, snapshot: ResidentSnapshot) -> Result<(), StructureError> {
        let residents = RecordList::load(snapshot.residents)?;
        if let Some(orphan) = snapshot
            .bills
            .iter()
            .find(|bill| residents.find(&bill.flat).is_none())
        {
            return Err(StructureError::not_found(orphan.flat.clone()));
        }

        let mut bills = UndoStack::new();
        for bill in snapshot.bills {
            bills.push(bill);
        }

        self.residents = residents;
        self.bills = bills;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident(flat: &str, name: &str, pending: i64) -> ResidentRecord {
        ResidentRecord {
            flat_number: flat.to_string(),
            name: name.to_string(),
            phone: "9876543210".to_string(),
            email: format!("{}@society.test", flat.to_lowercase()),
            pending_bills: pending,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 1).expect("valid date")
    }

    fn service() -> ResidentService {
        let mut service = ResidentService::new();
        service.add(resident("A-101", "Rajesh Kumar", 0)).expect("add");
        service.add(resident("A-102", "Priya Sharma", 1200)).expect("add");
        service.add(resident("B-101", "Amit Patel", 300)).expect("add");
        service
    }

    fn flats(records: &[ResidentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.flat_number.as_str()).collect()
    }

    #[test]
    fn add_rejects_duplicate_flats() {
        let mut service = service();
        let err = service
            .add(resident("A-101", "Someone Else", 0))
            .expect_err("duplicate flat");
        assert_eq!(
            err,
            StructureError::DuplicateKey {
                key: "A-101".to_string()
            }
        );
        assert_eq!(service.count(), 3);
    }

    #[test]
    fn bill_then_undo_restores_balance() {
        let mut service = service();
        let bill = service
            .add_bill("A-101", 500, "Maintenance", date())
            .expect("bill");
        assert_eq!(service.search("A-101").expect("a-101").pending_bills, 500);
        assert_eq!(service.total_pending(), 2000);

        let undone = service.undo_bill().expect("undo");
        assert_eq!(undone, bill);
        assert_eq!(service.search("A-101").expect("a-101").pending_bills, 0);
        assert!(service.bills().is_empty());
    }

    #[test]
    fn undo_is_global_not_per_flat() {
        let mut service = service();
        service.add_bill("A-101", 100, "Water", date()).expect("bill");
        service.add_bill("B-101", 250, "Parking", date()).expect("bill");

        let undone = service.undo_bill().expect("undo");
        assert_eq!(undone.flat, "B-101");
        assert_eq!(service.search("B-101").expect("b-101").pending_bills, 300);
        assert_eq!(service.search("A-101").expect("a-101").pending_bills, 100);
    }

    #[test]
    fn undo_on_empty_history_is_reported() {
        let mut service = service();
        assert_eq!(
            service.undo_bill(),
            Err(StructureError::Empty {
                structure: "billing history"
            })
        );
    }

    #[test]
    fn bill_for_unknown_flat_changes_nothing() {
        let mut service = service();
        assert!(matches!(
            service.add_bill("Z-999", 10, "Stray", date()),
            Err(StructureError::NotFound { .. })
        ));
        assert!(service.bills().is_empty());
        assert_eq!(service.total_pending(), 1500);
    }

    #[test]
    fn bill_past_the_balance_limit_is_rejected() {
        let mut service = service();
        service
            .add_bill("A-101", i64::MAX, "Arrears", date())
            .expect("first bill fits");

        assert_eq!(
            service.add_bill("A-101", 1, "Water", date()),
            Err(StructureError::BalanceOverflow {
                key: "A-101".to_string()
            })
        );
        assert_eq!(service.search("A-101").expect("a-101").pending_bills, i64::MAX);
        assert_eq!(service.bills().len(), 1);
        assert_eq!(service.undo_bill().expect("undo").amount, i64::MAX);
        assert_eq!(service.search("A-101").expect("a-101").pending_bills, 0);
    }

    #[test]
    fn total_pending_saturates_instead_of_wrapping() {
        let mut service = service();
        service
            .add_bill("A-101", i64::MAX, "Arrears", date())
            .expect("bill");
        service
            .add_bill("B-101", i64::MAX - 300, "Arrears", date())
            .expect("bill");

        assert_eq!(service.total_pending(), i64::MAX);
    }

    #[test]
    fn undo_that_would_leave_the_range_keeps_the_bill() {
        let mut service = ResidentService::new();
        service
            .load(ResidentSnapshot {
                residents: vec![resident("C-101", "Neha Gupta", i64::MIN)],
                bills: vec![BillRecord {
                    flat: "C-101".to_string(),
                    amount: 1,
                    description: "Imported".to_string(),
                    date: date(),
                }],
            })
            .expect("valid snapshot");

        assert!(matches!(
            service.undo_bill(),
            Err(StructureError::BalanceOverflow { .. })
        ));
        assert_eq!(service.bills().len(), 1);
        assert_eq!(service.search("C-101").expect("c-101").pending_bills, i64::MIN);
    }

    #[test]
    fn deleting_a_resident_drops_their_bills() {
        let mut service = service();
        service.add_bill("A-101", 100, "Water", date()).expect("bill");
        service.add_bill("A-102", 200, "Gym", date()).expect("bill");
        service.add_bill("A-101", 50, "Late fee", date()).expect("bill");

        service.delete("A-101").expect("delete");
        assert_eq!(service.bills().len(), 1);
        assert_eq!(service.undo_bill().expect("undo").flat, "A-102");
        assert!(matches!(
            service.delete("A-101"),
            Err(StructureError::NotFound { .. })
        ));
    }

    #[test]
    fn sort_orders_by_key_with_flat_tie_break() {
        let mut service = service();
        service.add(resident("A-201", "Amit Patel", 0)).expect("add");

        assert_eq!(
            flats(&service.sort(ResidentSortKey::PendingBills)),
            vec!["A-101", "A-201", "B-101", "A-102"]
        );
        assert_eq!(
            flats(&service.sort(ResidentSortKey::Name)),
            vec!["A-201", "B-101", "A-102", "A-101"]
        );
        assert_eq!(
            flats(&service.sort(ResidentSortKey::Flat)),
            vec!["A-101", "A-102", "A-201", "B-101"]
        );
        assert_eq!(flats(&service.list()), vec!["A-101", "A-102", "B-101", "A-201"]);
    }

    #[test]
    fn sort_is_idempotent() {
        let service = service();
        for key in [
            ResidentSortKey::Name,
            ResidentSortKey::Flat,
            ResidentSortKey::PendingBills,
        ] {
            let once = service.sort(key);
            let mut again = once.clone();
            crate::structures::sort::quick_sort_by(&mut again, |a, b| key.compare(a, b));
            assert_eq!(once, again);
        }
    }

    #[test]
    fn sort_key_parsing_accepts_aliases() {
        assert_eq!(ResidentSortKey::parse("bills"), Some(ResidentSortKey::PendingBills));
        assert_eq!(ResidentSortKey::parse(" Name "), Some(ResidentSortKey::Name));
        assert_eq!(ResidentSortKey::parse("flat"), Some(ResidentSortKey::Flat));
        assert_eq!(ResidentSortKey::parse("age"), None);
    }

    #[test]
    fn load_rejects_bills_for_unknown_flats_and_keeps_state() {
        let mut service = service();
        let snapshot = ResidentSnapshot {
            residents: vec![resident("C-101", "New", 0)],
            bills: vec![BillRecord {
                flat: "A-101".to_string(),
                amount: 10,
                description: "Orphan".to_string(),
                date: date(),
            }],
        };

        assert!(matches!(
            service.load(snapshot),
            Err(StructureError::NotFound { .. })
        ));
        assert_eq!(service.count(), 3);
    }

    #[test]
    fn dump_and_load_preserve_undo_order() {
        let mut service = service();
        service.add_bill("A-101", 100, "Water", date()).expect("bill");
        service.add_bill("B-101", 40, "Gym", date()).expect("bill");

        let mut restored = ResidentService::new();
        restored.load(service.dump()).expect("valid snapshot");

        assert_eq!(restored.list(), service.list());
        assert_eq!(restored.undo_bill().expect("undo").flat, "B-101");
    }
}
