//! Department registry: the single owner of every assigned employee.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::employee::{Department, Employee, EmployeeId};
use crate::ValidationError;

/// Efficiency every department starts with.
pub const BASE_EFFICIENCY: f64 = 50.0;
/// Efficiency ceiling.
pub const MAX_EFFICIENCY: f64 = 100.0;

/// Roster and efficiency of one department.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartmentStats {
    pub department: Department,
    pub employees: Vec<Employee>,
    pub efficiency: f64,
}

impl DepartmentStats {
    pub fn new(department: Department) -> Self {
        Self {
            department,
            employees: Vec::new(),
            efficiency: BASE_EFFICIENCY,
        }
    }

    /// Sum of effective productivity over the roster.
    pub fn total_productivity(&self) -> f64 {
        self.employees
            .iter()
            .map(Employee::effective_productivity)
            .sum()
    }

    /// Sum of quarterly salary cost over the roster.
    pub fn quarterly_cost(&self) -> Decimal {
        self.employees.iter().map(Employee::quarterly_cost).sum()
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    /// Raise efficiency, capped at [`MAX_EFFICIENCY`].
    pub fn raise_efficiency(&mut self, amount: f64) {
        self.efficiency = (self.efficiency + amount).clamp(0.0, MAX_EFFICIENCY);
    }

    /// Remove the employee at `index` from the roster and clear its assignment.
    ///
    /// Panics if `index` is out of bounds, like [`Vec::remove`].
    pub fn release(&mut self, index: usize) -> Employee {
        let mut employee = self.employees.remove(index);
        employee.assigned_department = None;
        employee.is_assigned = false;
        employee
    }

    fn position(&self, id: EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e.id == id)
    }
}

/// Fixed set of six departments, one slot per [`Department`] in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentRegistry {
    departments: [DepartmentStats; 6],
}

impl Default for DepartmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DepartmentRegistry {
    /// Six empty departments at base efficiency.
    pub fn new() -> Self {
        Self {
            departments: Department::ALL.map(DepartmentStats::new),
        }
    }

    pub fn get(&self, department: Department) -> &DepartmentStats {
        &self.departments[department.index()]
    }

    pub fn get_mut(&mut self, department: Department) -> &mut DepartmentStats {
        &mut self.departments[department.index()]
    }

    /// Departments in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DepartmentStats> {
        self.departments.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DepartmentStats> {
        self.departments.iter_mut()
    }

    /// Every assigned employee, department by department.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.departments.iter().flat_map(|d| d.employees.iter())
    }

    pub fn employees_mut(&mut self) -> impl Iterator<Item = &mut Employee> {
        self.departments.iter_mut().flat_map(|d| d.employees.iter_mut())
    }

    /// Move `employee` into `department`, marking it assigned there.
    pub fn assign(&mut self, mut employee: Employee, department: Department) {
        employee.assigned_department = Some(department);
        employee.is_assigned = true;
        self.get_mut(department).employees.push(employee);
    }

    /// Department currently holding `id`.
    pub fn locate(&self, id: EmployeeId) -> Option<Department> {
        self.departments
            .iter()
            .find(|d| d.position(id).is_some())
            .map(|d| d.department)
    }

    pub fn find(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees().find(|e| e.id == id)
    }

    /// Remove `id` from whichever department holds it.
    pub fn remove(&mut self, id: EmployeeId) -> Option<Employee> {
        let department = self.locate(id)?;
        let stats = self.get_mut(department);
        let index = stats.position(id)?;
        Some(stats.release(index))
    }

    /// Move `id` to `to`, returning the department it left.
    pub fn transfer(&mut self, id: EmployeeId, to: Department) -> Option<Department> {
        let from = self.locate(id)?;
        let employee = self.remove(id)?;
        self.assign(employee, to);
        Some(from)
    }

    /// Total assigned headcount.
    pub fn employee_count(&self) -> usize {
        self.departments.iter().map(DepartmentStats::employee_count).sum()
    }

    /// Sum of effective productivity across all departments.
    pub fn total_productivity(&self) -> f64 {
        self.departments
            .iter()
            .map(DepartmentStats::total_productivity)
            .sum()
    }

    /// Sum of quarterly salary cost across all departments.
    pub fn quarterly_cost(&self) -> Decimal {
        self.departments
            .iter()
            .map(DepartmentStats::quarterly_cost)
            .sum()
    }

    /// Check slot order, assignment bookkeeping and id uniqueness.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for (slot, stats) in Department::ALL.iter().zip(self.departments.iter()) {
            if stats.department != *slot {
                return Err(ValidationError::DepartmentOrder {
                    expected: *slot,
                    found: stats.department,
                });
            }
            if !stats.efficiency.is_finite() {
                return Err(ValidationError::NonFinite);
            }
            for e in &stats.employees {
                if e.assigned_department != Some(*slot) || !e.is_assigned {
                    return Err(ValidationError::DepartmentMismatch(e.id, *slot));
                }
                if !seen.insert(e.id) {
                    return Err(ValidationError::DuplicateEmployee(e.id));
                }
                crate::validate_employee(e)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::tests::sample_employee;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn new_registry_has_six_empty_departments() {
        let reg = DepartmentRegistry::new();
        assert_eq!(reg.iter().count(), 6);
        assert_eq!(reg.employee_count(), 0);
        assert_eq!(reg.quarterly_cost(), Decimal::ZERO);
        for d in reg.iter() {
            assert_eq!(d.efficiency, BASE_EFFICIENCY);
        }
        reg.validate().unwrap();
    }

    #[test]
    fn assign_transfer_and_remove_keep_single_owner() {
        let mut reg = DepartmentRegistry::new();
        let e = sample_employee(Department::Research);
        let id = e.id;
        reg.assign(e, Department::Finance);
        assert_eq!(reg.locate(id), Some(Department::Finance));
        assert_eq!(reg.transfer(id, Department::Research), Some(Department::Finance));
        assert_eq!(reg.locate(id), Some(Department::Research));
        assert_eq!(reg.get(Department::Finance).employee_count(), 0);
        assert_eq!(reg.employee_count(), 1);
        reg.validate().unwrap();

        let removed = reg.remove(id).unwrap();
        assert!(!removed.is_assigned);
        assert_eq!(removed.assigned_department, None);
        assert_eq!(reg.employee_count(), 0);
        assert!(reg.remove(id).is_none());
    }

    #[test]
    fn efficiency_is_capped() {
        let mut reg = DepartmentRegistry::new();
        let ops = reg.get_mut(Department::Operations);
        for _ in 0..20 {
            ops.raise_efficiency(5.0);
        }
        assert_eq!(ops.efficiency, MAX_EFFICIENCY);
    }

    #[test]
    fn validate_flags_stale_assignment() {
        let mut reg = DepartmentRegistry::new();
        let mut e = sample_employee(Department::It);
        e.assigned_department = Some(Department::Marketing);
        e.is_assigned = true;
        let id = e.id;
        reg.get_mut(Department::It).employees.push(e);
        assert_eq!(
            reg.validate(),
            Err(ValidationError::DepartmentMismatch(id, Department::It))
        );
    }

    #[test]
    fn serializes_as_ordered_list() {
        let reg = DepartmentRegistry::new();
        let json = serde_json::to_string(&reg).unwrap();
        let back: DepartmentRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reg);
        assert!(json.starts_with('['));
    }

    proptest! {
        #[test]
        fn aggregates_match_per_department_sums(seed in any::<u64>(), n in 0usize..24) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut reg = DepartmentRegistry::new();
            for _ in 0..n {
                let e = Employee::generate_random(10, &mut rng);
                let dept = Department::random(&mut rng);
                reg.assign(e, dept);
            }
            prop_assert_eq!(reg.employee_count(), n);
            let cost: Decimal = reg.employees().map(Employee::quarterly_cost).sum();
            prop_assert_eq!(reg.quarterly_cost(), cost);
            prop_assert!(reg.validate().is_ok());
        }
    }
}
