use chrono::Local;
use clap::Args;
use society::config::DEFAULT_SOCIETY_NAME;
use society::error::AppError;
use society::records::ResidentRecord;
use society::services::ResidentSortKey;
use society::SocietyContext;
use std::io::Write;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Society name shown in the building directory
    #[arg(long)]
    pub(crate) society: Option<String>,
    /// Amount billed to A-101 before the undo
    #[arg(long, default_value_t = 500)]
    pub(crate) bill_amount: i64,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            society: None,
            bill_amount: 500,
        }
    }
}

const DEMO_RESIDENTS: [(&str, &str, &str); 3] = [
    ("A-101", "Rajesh Kumar", "Tower A"),
    ("A-102", "Priya Sharma", "Tower A"),
    ("B-101", "Amit Patel", "Tower B"),
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    walkthrough(args, &mut stdout.lock())
}

fn walkthrough(args: DemoArgs, out: &mut impl Write) -> Result<(), AppError> {
    let society = args
        .society
        .unwrap_or_else(|| DEFAULT_SOCIETY_NAME.to_string());
    let context = SocietyContext::new(society.clone());
    writeln!(out, "Society records demo: {society}")?;

    writeln!(out, "\nResidents")?;
    for (flat, name, tower) in DEMO_RESIDENTS {
        let resident = context.residents().add(ResidentRecord {
            flat_number: flat.to_string(),
            name: name.to_string(),
            phone: String::new(),
            email: format!("{}@example.in", flat.to_ascii_lowercase()),
            pending_bills: 0,
        })?;
        context.building().ensure_flat(tower, 1, flat)?;
        writeln!(out, "  + {} {}", resident.flat_number, resident.name)?;
    }

    writeln!(out, "\nBilling")?;
    let today = Local::now().date_naive();
    let bill = context
        .residents()
        .add_bill("A-101", args.bill_amount, "Maintenance", today)?;
    let pending = context.residents().search("A-101")?.pending_bills;
    writeln!(
        out,
        "  billed {} to {} ({}), pending now {}",
        bill.amount, bill.flat, bill.description, pending
    )?;

    let undone = context.residents().undo_bill()?;
    let pending = context.residents().search(&undone.flat)?.pending_bills;
    writeln!(
        out,
        "  undid {} on {}, pending back to {}",
        undone.amount, undone.flat, pending
    )?;

    writeln!(out, "\nSearch")?;
    let found = context.residents().search("B-101")?;
    let location = context.building().search("B-101")?;
    writeln!(
        out,
        "  B-101 -> {} ({}, floor {})",
        found.name, location.tower, location.floor
    )?;

    let key = ResidentSortKey::PendingBills;
    writeln!(out, "\nSorted by {}", key.label())?;
    for resident in context.residents().sort(key) {
        writeln!(
            out,
            "  {} {} pending {}",
            resident.flat_number, resident.name, resident.pending_bills
        )?;
    }

    let stats = context.stats();
    writeln!(
        out,
        "\n{} residents across {} flats, {} outstanding",
        stats.total_residents, stats.total_flats, stats.total_billing
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkthrough_reverses_the_bill() {
        let mut out = Vec::new();
        walkthrough(DemoArgs::default(), &mut out).expect("demo runs");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("billed 500 to A-101 (Maintenance), pending now 500"));
        assert!(text.contains("undid 500 on A-101, pending back to 0"));
        assert!(text.contains("B-101 -> Amit Patel (Tower B, floor 1)"));
        assert!(text.contains("3 residents across 3 flats, 0 outstanding"));
    }

    #[test]
    fn sorted_listing_is_ordered_by_flat_on_equal_bills() {
        let mut out = Vec::new();
        walkthrough(
            DemoArgs {
                society: Some("Lake View".to_string()),
                bill_amount: 250,
            },
            &mut out,
        )
        .expect("demo runs");

        let text = String::from_utf8(out).expect("utf8");
        let sorted = text
            .split("Sorted by pending_bills")
            .nth(1)
            .expect("sorted section");
        let a101 = sorted.find("A-101").expect("A-101 listed");
        let a102 = sorted.find("A-102").expect("A-102 listed");
        let b101 = sorted.find("B-101").expect("B-101 listed");
        assert!(a101 < a102 && a102 < b101);
        assert!(text.starts_with("Society records demo: Lake View"));
    }
}
