use crate::domain::employee::Employee;
use crate::error::{PayrollError, Result};
use std::io::Read;

/// Reads an employee roster from a CSV source.
///
/// Expects the header `id,name,address,salary,department,position`. Fields
/// are trimmed, and quoted fields may contain commas.
pub struct RosterReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RosterReader<R> {
    /// Creates a new `RosterReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes employees.
    pub fn employees(self) -> impl Iterator<Item = Result<Employee>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PayrollError::from))
    }

    /// Reads the whole roster, failing on the first bad row or duplicate id.
    pub fn read_all(self) -> Result<Vec<Employee>> {
        let employees = self.employees().collect::<Result<Vec<_>>>()?;
        let mut seen = std::collections::HashSet::new();
        for employee in &employees {
            if !seen.insert(employee.id) {
                return Err(PayrollError::Configuration(format!(
                    "duplicate employee id {} in roster",
                    employee.id
                )));
            }
        }
        Ok(employees)
    }
}
