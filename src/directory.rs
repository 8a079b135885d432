//! Customer directory used to personalise calls

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// An order placed by a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub id: String,
    pub name: String,
}

/// Customer name and their most recent order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContext {
    pub name: String,
    pub last_order: CustomerOrder,
}

impl CustomerContext {
    pub fn new(
        name: impl Into<String>,
        order_id: impl Into<String>,
        order_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            last_order: CustomerOrder {
                id: order_id.into(),
                name: order_name.into(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Failed to read customer directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid customer directory: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Customer directory unavailable: {0}")]
    #[allow(dead_code)] // Used in tests
    Unavailable(String),
}

/// Resolves a phone number to the customer behind it
pub trait CustomerDirectory: Send + Sync {
    /// `Ok(None)` means the number is not known to the directory
    fn lookup(&self, phone_number: &str) -> Result<Option<CustomerContext>, LookupError>;
}

/// On-disk layout of a directory file
#[derive(Debug, Default, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    default: Option<CustomerContext>,
    #[serde(default)]
    customers: HashMap<String, CustomerContext>,
}

/// In-memory directory keyed by phone number, with an optional catch-all entry
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    default: Option<CustomerContext>,
    customers: HashMap<String, CustomerContext>,
}

impl StaticDirectory {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Directory that answers every number with the demo customer
    pub fn sample() -> Self {
        Self::empty().with_default(CustomerContext::new(
            "Abhinav",
            "1234",
            "Jaxl Business Phone",
        ))
    }

    /// Load from a JSON file of the form
    /// `{"default": {...}, "customers": {"+1555...": {...}}}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        let raw = std::fs::read_to_string(path)?;
        let file: DirectoryFile = serde_json::from_str(&raw)?;
        Ok(Self {
            default: file.default,
            customers: file.customers,
        })
    }

    #[must_use]
    pub fn with_default(mut self, customer: CustomerContext) -> Self {
        self.default = Some(customer);
        self
    }

    #[must_use]
    pub fn with_customer(
        mut self,
        phone_number: impl Into<String>,
        customer: CustomerContext,
    ) -> Self {
        self.customers.insert(phone_number.into(), customer);
        self
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }
}

impl CustomerDirectory for StaticDirectory {
    fn lookup(&self, phone_number: &str) -> Result<Option<CustomerContext>, LookupError> {
        Ok(self
            .customers
            .get(phone_number)
            .or(self.default.as_ref())
            .cloned())
    }
}
