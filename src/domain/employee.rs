use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A roster entry eligible for payment.
///
/// `address` is kept exactly as the roster spells it; it is validated when a
/// transfer is encoded so that one bad entry fails on its own.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Employee {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub salary: Decimal,
    pub department: String,
    pub position: String,
}

/// Picks the employees whose id is in `ids`, keeping roster order.
///
/// Unknown ids are ignored and duplicated ids select an employee once.
pub fn select_employees(roster: &[Employee], ids: &[u32]) -> Vec<Employee> {
    roster
        .iter()
        .filter(|employee| ids.contains(&employee.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn employee(id: u32) -> Employee {
        Employee {
            id,
            name: format!("Employee {id}"),
            address: format!("0x{:040x}", id),
            salary: dec!(10.0),
            department: "Engineering".into(),
            position: "Developer".into(),
        }
    }

    #[test]
    fn test_select_keeps_roster_order() {
        let roster = vec![employee(1), employee(2), employee(3)];
        let selected = select_employees(&roster, &[3, 1, 1, 99]);
        let ids: Vec<u32> = selected.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_select_nothing() {
        let roster = vec![employee(1)];
        assert!(select_employees(&roster, &[]).is_empty());
    }
}
