//! JSON API over a shared [`SocietyContext`].
//!
//! Every response uses the same envelope: `success`, then `data`, `count` and `message` when
//! they apply. Handlers take one service lock at a time and never hold it across an await.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::access::Caller;
use crate::context::SocietyContext;
use crate::error::structure_status;
use crate::records::{ComplaintRecord, ResidentRecord, VisitorRecord};
use crate::services::{FacilityConnections, ResidentSortKey};
use crate::structures::StructureError;

pub type SharedContext = Arc<SocietyContext>;

pub fn society_router(context: SharedContext) -> Router {
    Router::new()
        .route("/api/residents", get(list_residents).post(add_resident))
        .route("/api/residents/search/:flat", get(search_resident))
        .route("/api/residents/sort", get(sort_residents))
        .route("/api/residents/:flat", delete(delete_resident))
        .route("/api/bills", get(list_bills).post(add_bill))
        .route("/api/bills/undo", post(undo_bill))
        .route("/api/visitors", get(list_visitors).post(add_visitor))
        .route("/api/visitors/process", post(process_visitor))
        .route("/api/complaints", get(list_complaints).post(add_complaint))
        .route("/api/complaints/resolve", post(resolve_complaint))
        .route("/api/facilities", get(list_facilities))
        .route("/api/facilities/route", get(facility_route))
        .route("/api/building/structure", get(building_structure))
        .route("/api/building/search/:flat", get(search_flat_location))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .with_state(context)
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
        }
    }

    fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

fn listing<T: Serialize>(items: Vec<T>) -> Response {
    let count = items.len();
    Envelope {
        success: true,
        data: Some(items),
        count: Some(count),
        message: None,
    }
    .respond(StatusCode::OK)
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    Envelope::<()> {
        success: false,
        data: None,
        count: None,
        message: Some(message.into()),
    }
    .respond(status)
}

fn structure_failure(err: StructureError) -> Response {
    warn!(error = %err, "request rejected");
    failure(structure_status(&err), err.to_string())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn clock_time() -> NaiveTime {
    let now = Local::now().time();
    now.with_nanosecond(0).unwrap_or(now)
}

#[derive(Debug, Deserialize)]
pub struct SortQuery {
    #[serde(default)]
    pub by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewBill {
    pub flat: String,
    pub amount: i64,
    #[serde(alias = "desc")]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewVisitor {
    pub name: String,
    pub flat: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewComplaint {
    pub title: String,
    pub flat: String,
    pub priority: i64,
    #[serde(alias = "desc")]
    pub description: String,
}

#[derive(Debug, Serialize)]
struct FacilityOverview {
    facilities: Vec<String>,
    connections: Vec<FacilityConnections>,
}

#[derive(Debug, Serialize)]
struct FacilityRoute {
    from: String,
    to: String,
    route: Option<Vec<String>>,
}

async fn list_residents(_caller: Caller, State(context): State<SharedContext>) -> Response {
    let residents = context.residents().list();
    listing(residents)
}

async fn search_resident(
    _caller: Caller,
    State(context): State<SharedContext>,
    Path(flat): Path<String>,
) -> Response {
    let found = context.residents().search(&flat);
    match found {
        Ok(resident) => Envelope::data(resident).respond(StatusCode::OK),
        Err(err) => structure_failure(err),
    }
}

async fn sort_residents(
    _caller: Caller,
    State(context): State<SharedContext>,
    Query(query): Query<SortQuery>,
) -> Response {
    let raw = query.by.as_deref().unwrap_or("name");
    let Some(key) = ResidentSortKey::parse(raw) else {
        return failure(
            StatusCode::BAD_REQUEST,
            format!("cannot sort residents by '{raw}'"),
        );
    };

    let residents = context.residents().sort(key);
    listing(residents)
}

async fn add_resident(
    caller: Caller,
    State(context): State<SharedContext>,
    Json(resident): Json<ResidentRecord>,
) -> Response {
    if let Err(denied) = caller.require_admin() {
        return denied.into_response();
    }

    let added = context.residents().add(resident);
    match added {
        Ok(resident) => Envelope::data(resident)
            .with_message("Resident added")
            .respond(StatusCode::CREATED),
        Err(err) => structure_failure(err),
    }
}

async fn delete_resident(
    caller: Caller,
    State(context): State<SharedContext>,
    Path(flat): Path<String>,
) -> Response {
    if let Err(denied) = caller.require_admin() {
        return denied.into_response();
    }

    let removed = context.residents().delete(&flat);
    match removed {
        Ok(resident) => Envelope::data(resident)
            .with_message("Resident deleted")
            .respond(StatusCode::OK),
        Err(err) => structure_failure(err),
    }
}

async fn list_bills(caller: Caller, State(context): State<SharedContext>) -> Response {
    let bills = {
        let residents = context.residents();
        match caller.visible_flat() {
            Some(flat) => residents.bills_for(flat),
            None => residents.bills(),
        }
    };
    listing(bills)
}

async fn add_bill(
    caller: Caller,
    State(context): State<SharedContext>,
    Json(bill): Json<NewBill>,
) -> Response {
    if let Err(denied) = caller.require_admin() {
        return denied.into_response();
    }

    let added = context
        .residents()
        .add_bill(&bill.flat, bill.amount, bill.description, today());
    match added {
        Ok(bill) => Envelope::data(bill)
            .with_message("Bill added")
            .respond(StatusCode::CREATED),
        Err(err) => structure_failure(err),
    }
}

async fn undo_bill(caller: Caller, State(context): State<SharedContext>) -> Response {
    if let Err(denied) = caller.require_admin() {
        return denied.into_response();
    }

    let undone = context.residents().undo_bill();
    match undone {
        Ok(bill) => Envelope::data(bill)
            .with_message("Bill undone")
            .respond(StatusCode::OK),
        Err(err) => structure_failure(err),
    }
}

async fn list_visitors(_caller: Caller, State(context): State<SharedContext>) -> Response {
    let visitors = context.visitors().list();
    listing(visitors)
}

async fn add_visitor(
    _caller: Caller,
    State(context): State<SharedContext>,
    Json(visitor): Json<NewVisitor>,
) -> Response {
    let record = VisitorRecord {
        name: visitor.name,
        flat: visitor.flat,
        purpose: visitor.purpose,
        time: clock_time(),
    };
    let queued = context.visitors().enqueue(record);
    Envelope::data(queued)
        .with_message("Visitor added")
        .respond(StatusCode::CREATED)
}

async fn process_visitor(caller: Caller, State(context): State<SharedContext>) -> Response {
    if let Err(denied) = caller.require_admin() {
        return denied.into_response();
    }

    let next = context.visitors().dequeue();
    match next {
        Ok(visitor) => Envelope::data(visitor)
            .with_message("Visitor processed")
            .respond(StatusCode::OK),
        Err(err) => structure_failure(err),
    }
}

async fn list_complaints(caller: Caller, State(context): State<SharedContext>) -> Response {
    let complaints = {
        let complaints = context.complaints();
        match caller.visible_flat() {
            Some(flat) => complaints.list_for_flat(flat),
            None => complaints.list(),
        }
    };
    listing(complaints)
}

async fn add_complaint(
    _caller: Caller,
    State(context): State<SharedContext>,
    Json(complaint): Json<NewComplaint>,
) -> Response {
    let record = ComplaintRecord {
        title: complaint.title,
        flat: complaint.flat,
        priority: complaint.priority,
        description: complaint.description,
        time: clock_time(),
    };
    let filed = context.complaints().add(record);
    Envelope::data(filed)
        .with_message("Complaint submitted")
        .respond(StatusCode::CREATED)
}

async fn resolve_complaint(caller: Caller, State(context): State<SharedContext>) -> Response {
    if let Err(denied) = caller.require_admin() {
        return denied.into_response();
    }

    let resolved = context.complaints().resolve();
    match resolved {
        Ok(complaint) => Envelope::data(complaint)
            .with_message("Complaint resolved")
            .respond(StatusCode::OK),
        Err(err) => structure_failure(err),
    }
}

async fn list_facilities(_caller: Caller, State(context): State<SharedContext>) -> Response {
    let overview = {
        let facilities = context.facilities();
        FacilityOverview {
            facilities: facilities.facilities(),
            connections: facilities.connection_table(),
        }
    };
    Envelope::data(overview).respond(StatusCode::OK)
}

async fn facility_route(
    _caller: Caller,
    State(context): State<SharedContext>,
    Query(query): Query<RouteQuery>,
) -> Response {
    let route = context.facilities().route(&query.from, &query.to);
    match route {
        Ok(route) => Envelope::data(FacilityRoute {
            from: query.from,
            to: query.to,
            route,
        })
        .respond(StatusCode::OK),
        Err(err) => structure_failure(err),
    }
}

async fn building_structure(_caller: Caller, State(context): State<SharedContext>) -> Response {
    let towers = context.building().structure();
    Envelope::data(towers).respond(StatusCode::OK)
}

async fn search_flat_location(
    _caller: Caller,
    State(context): State<SharedContext>,
    Path(flat): Path<String>,
) -> Response {
    let location = context.building().search(&flat);
    match location {
        Ok(location) => Envelope::data(location).respond(StatusCode::OK),
        Err(err) => structure_failure(err),
    }
}

async fn dashboard_stats(_caller: Caller, State(context): State<SharedContext>) -> Response {
    Envelope::data(context.stats()).respond(StatusCode::OK)
}
