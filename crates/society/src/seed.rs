//! Start-up data for a fresh society with no persisted snapshot.

use chrono::NaiveTime;
use tracing::info;

use crate::context::SocietyContext;
use crate::records::{ComplaintRecord, ResidentRecord, VisitorRecord};
use crate::structures::StructureError;

pub const TOWERS: [(&str, &str); 2] = [("Tower A", "A"), ("Tower B", "B")];
pub const FLOORS_PER_TOWER: u32 = 3;
pub const FLATS_PER_FLOOR: u32 = 2;

pub const FACILITIES: [&str; 6] = [
    "Swimming Pool",
    "Gym",
    "Parking",
    "Garden",
    "Tennis Court",
    "Kids Play Area",
];

pub const FACILITY_LINKS: [(&str, &str); 6] = [
    ("Swimming Pool", "Gym"),
    ("Swimming Pool", "Garden"),
    ("Gym", "Parking"),
    ("Garden", "Kids Play Area"),
    ("Garden", "Tennis Court"),
    ("Parking", "Tennis Court"),
];

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn resident(flat: &str, name: &str, phone: &str, email: &str) -> ResidentRecord {
    ResidentRecord {
        flat_number: flat.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        pending_bills: 0,
    }
}

/// Install the sample towers, facilities, residents, visitors and complaints.
pub fn populate(context: &SocietyContext) -> Result<(), StructureError> {
    {
        let mut building = context.building();
        for (tower_name, prefix) in TOWERS {
            let tower = building.add_tower(tower_name);
            for floor_number in 1..=FLOORS_PER_TOWER {
                let floor = building.add_floor(tower, floor_number)?;
                for flat in 1..=FLATS_PER_FLOOR {
                    building.add_flat(floor, format!("{prefix}-{floor_number}0{flat}"))?;
                }
            }
        }
    }

    {
        let mut facilities = context.facilities();
        for facility in FACILITIES {
            facilities.add_facility(facility);
        }
        for (a, b) in FACILITY_LINKS {
            facilities.connect(a, b)?;
        }
    }

    {
        let mut residents = context.residents();
        residents.add(resident(
            "A-101",
            "Rajesh Kumar",
            "9876543210",
            "rajesh@greenvalley.in",
        ))?;
        residents.add(resident(
            "A-102",
            "Priya Sharma",
            "9876543211",
            "priya@greenvalley.in",
        ))?;
        residents.add(resident(
            "B-101",
            "Amit Patel",
            "9876543212",
            "amit@greenvalley.in",
        ))?;
    }

    {
        let mut visitors = context.visitors();
        visitors.enqueue(VisitorRecord {
            name: "Courier Express".to_string(),
            flat: "A-101".to_string(),
            purpose: "Delivery".to_string(),
            time: at(9, 15),
        });
        visitors.enqueue(VisitorRecord {
            name: "Suresh Mehta".to_string(),
            flat: "B-101".to_string(),
            purpose: "Guest".to_string(),
            time: at(10, 40),
        });
    }

    {
        let mut complaints = context.complaints();
        complaints.add(ComplaintRecord {
            title: "Water leakage".to_string(),
            flat: "A-102".to_string(),
            priority: 1,
            description: "Ceiling leaks near the kitchen".to_string(),
            time: at(8, 5),
        });
        complaints.add(ComplaintRecord {
            title: "Corridor light".to_string(),
            flat: "B-101".to_string(),
            priority: 3,
            description: "Third floor corridor light is out".to_string(),
            time: at(11, 20),
        });
    }

    info!(
        society = %context.building().society(),
        "sample society data installed"
    );
    Ok(())
}
