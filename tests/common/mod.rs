#![allow(dead_code)]

use payroll_disburser::domain::employee::Employee;
use rust_decimal::Decimal;
use std::io::Error;
use std::path::Path;

pub fn employee(id: u32, salary: Decimal) -> Employee {
    Employee {
        id,
        name: format!("Employee {id}"),
        address: format!("0x{:040x}", 0xbeef00 + id),
        salary,
        department: "Engineering".into(),
        position: "Developer".into(),
    }
}

pub fn write_roster(path: &Path, employees: &[Employee]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    for employee in employees {
        wtr.serialize(employee)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Hash the in-memory wallet assigns to the `n`th accepted submission.
pub fn dry_run_hash(n: u64) -> String {
    format!("0x{:064x}", n)
}
