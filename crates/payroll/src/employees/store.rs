//! [`EmployeeStore`]: thread-safe in-memory persistence for employee records.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

/// Errors produced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record exists with this id.
    #[error("employee {0} does not exist")]
    NotFound(i64),
}

/// A persisted employee. The salary is held only in encrypted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: i64,
    pub name: String,
    /// Encoded ciphertext of the decimal salary.
    pub salary_encrypted: String,
    pub department: String,
}

/// Fields of a record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub salary_encrypted: String,
    pub department: String,
}

#[derive(Debug)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, EmployeeRecord>,
}

/// Thread-safe employee table.
///
/// Wraps an `Arc<RwLock<_>>` so that concurrent reads proceed in parallel while
/// writes take a short exclusive lock. Ids start at 1 and are never reused.
#[derive(Clone, Debug)]
pub struct EmployeeStore {
    inner: Arc<RwLock<Inner>>,
}

impl EmployeeStore {
    /// Create a new, empty [`EmployeeStore`].
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            })),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// All records in ascending id order.
    pub async fn find_all(&self) -> Vec<EmployeeRecord> {
        self.inner.read().await.records.values().cloned().collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Option<EmployeeRecord> {
        self.inner.read().await.records.get(&id).cloned()
    }

    /// Insert a new record and return its assigned id.
    pub async fn insert(&self, employee: NewEmployee) -> i64 {
        let mut lock = self.inner.write().await;
        let id = lock.next_id;
        lock.next_id += 1;
        lock.records.insert(
            id,
            EmployeeRecord {
                id,
                name: employee.name,
                salary_encrypted: employee.salary_encrypted,
                department: employee.department,
            },
        );
        id
    }

    /// Delete a record. A missing id is silently ignored.
    pub async fn delete(&self, id: i64) {
        self.inner.write().await.records.remove(&id);
    }

    /// Replace an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has `record.id`.
    pub async fn update(&self, record: EmployeeRecord) -> Result<(), StoreError> {
        let mut lock = self.inner.write().await;
        match lock.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id)),
        }
    }
}

impl Default for EmployeeStore {
    fn default() -> Self {
        Self::new()
    }
}
