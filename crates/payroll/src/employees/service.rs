//! Employee operations: validation, salary encryption, and persistence.

use std::sync::Arc;

use common::protocol::{Employee, EmployeeAddRequest};
use common::validation::{require_non_empty, require_positive};
use common::{ErrorReason, ServiceError};
use tracing::{debug, error};

use super::store::{EmployeeRecord, EmployeeStore, NewEmployee};
use crate::crypto::{CryptoError, Encrypter};

/// Orchestrates the employee use cases.
///
/// Salaries cross this type as plaintext on the API side and as encoded
/// ciphertext on the store side; nothing else in the record is encrypted.
#[derive(Clone)]
pub struct EmployeeService {
    store: EmployeeStore,
    encrypter: Arc<dyn Encrypter>,
}

impl EmployeeService {
    pub fn new(store: EmployeeStore, encrypter: Arc<dyn Encrypter>) -> Self {
        Self { store, encrypter }
    }

    pub fn store(&self) -> &EmployeeStore {
        &self.store
    }

    /// Re-run the encryption self-test against the live encrypter.
    pub fn key_ready(&self) -> bool {
        self.encrypter.encrypt("").is_ok()
    }

    /// All employees with their salaries decrypted.
    ///
    /// # Errors
    ///
    /// Fails with an internal error if any stored salary cannot be decrypted.
    pub async fn retrieve_employees(&self) -> Result<Vec<Employee>, ServiceError> {
        self.store
            .find_all()
            .await
            .into_iter()
            .map(|rec| self.to_dto(rec))
            .collect()
    }

    /// One employee by id.
    ///
    /// # Errors
    ///
    /// - `EmployeeIdNegative` (400) if `id <= 0`.
    /// - `GetEmployeeNotFound` (404) if no such employee exists.
    /// - `DecryptionFailed` / `CorruptedRecord` (500) for an unreadable salary.
    pub async fn get_employee(&self, id: i64) -> Result<Employee, ServiceError> {
        let id = validated(require_positive(Some(id), ErrorReason::EmployeeIdNegative))?;
        let rec = self
            .store
            .find_by_id(id)
            .await
            .ok_or(ServiceError::NotFound(ErrorReason::GetEmployeeNotFound))?;
        self.to_dto(rec)
    }

    /// Validate, encrypt the salary, and store a new employee.
    ///
    /// Checks run in order name, department, salary; the first failure is
    /// reported.
    pub async fn save_employee(&self, employee: EmployeeAddRequest) -> Result<i64, ServiceError> {
        let name = validated(require_non_empty(
            employee.name.as_deref(),
            ErrorReason::EmployeeNameEmpty,
        ))?;
        let department = validated(require_non_empty(
            employee.department.as_deref(),
            ErrorReason::EmployeeDeptEmpty,
        ))?;
        let salary = validated(require_positive(
            employee.salary,
            ErrorReason::EmployeeSalaryNegative,
        ))?;

        let salary_encrypted = self.encrypt_salary(salary, None)?;
        let id = self
            .store
            .insert(NewEmployee {
                name: name.to_owned(),
                salary_encrypted,
                department: department.to_owned(),
            })
            .await;
        debug!(employee_id = id, "employee saved");
        Ok(id)
    }

    /// Delete an employee; deleting a missing id succeeds.
    pub async fn delete_employee(&self, id: i64) -> Result<(), ServiceError> {
        let id = validated(require_positive(Some(id), ErrorReason::EmployeeIdNegative))?;
        self.store.delete(id).await;
        debug!(employee_id = id, "employee deleted");
        Ok(())
    }

    /// Validate, encrypt the salary, and replace an existing employee.
    ///
    /// Checks run in order id, name, department, salary.
    pub async fn update_employee(&self, employee: Employee) -> Result<(), ServiceError> {
        let id = validated(require_positive(employee.id, ErrorReason::EmployeeIdNegative))?;
        let name = validated(require_non_empty(
            employee.name.as_deref(),
            ErrorReason::EmployeeNameEmpty,
        ))?;
        let department = validated(require_non_empty(
            employee.department.as_deref(),
            ErrorReason::EmployeeDeptEmpty,
        ))?;
        let salary = validated(require_positive(
            employee.salary,
            ErrorReason::EmployeeSalaryNegative,
        ))?;

        let salary_encrypted = self.encrypt_salary(salary, Some(id))?;
        self.store
            .update(EmployeeRecord {
                id,
                name: name.to_owned(),
                salary_encrypted,
                department: department.to_owned(),
            })
            .await
            .map_err(|_| ServiceError::NotFound(ErrorReason::UpdateEmployeeNotFound))?;
        debug!(employee_id = id, "employee updated");
        Ok(())
    }

    fn encrypt_salary(&self, salary: i32, employee_id: Option<i64>) -> Result<String, ServiceError> {
        self.encrypter
            .encrypt(&salary.to_string())
            .map_err(|e| crypto_failure(e, employee_id))
    }

    fn to_dto(&self, rec: EmployeeRecord) -> Result<Employee, ServiceError> {
        let plaintext = self
            .encrypter
            .decrypt(&rec.salary_encrypted)
            .map_err(|e| crypto_failure(e, Some(rec.id)))?;
        let salary = plaintext.parse::<i32>().map_err(|_| {
            error!(employee_id = rec.id, "decrypted salary is not a number");
            ServiceError::Internal(ErrorReason::CorruptedRecord)
        })?;
        Ok(Employee {
            id: Some(rec.id),
            name: Some(rec.name),
            salary: Some(salary),
            department: Some(rec.department),
        })
    }
}

/// Convert a precondition failure into a client error, logging only at debug.
fn validated<T>(result: Result<T, common::ValidationError>) -> Result<T, ServiceError> {
    result.map_err(|e| {
        debug!(reason = ?e.reason, "request failed validation");
        ServiceError::from(e)
    })
}

fn crypto_failure(err: CryptoError, employee_id: Option<i64>) -> ServiceError {
    error!(employee_id, error = %err, "salary cipher operation failed");
    ServiceError::from(err)
}
