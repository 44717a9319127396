use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Every service books a one-hour appointment.
pub const SERVICE_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Price in the smallest displayed currency unit.
    #[serde(rename = "price")]
    pub price_minor: u64,
}

impl Service {
    pub fn duration_minutes(&self) -> u32 {
        SERVICE_DURATION_MINUTES
    }
}

/// The services offered on the booking form, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<Service>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        let mut catalog_total: u64 = 0;
        for service in &services {
            if service.id.as_str().trim().is_empty() {
                return Err(AppError::Catalog("service with empty id".to_string()));
            }
            if service.name.trim().is_empty() {
                return Err(AppError::Catalog(format!("service {} has no name", service.id)));
            }
            if !seen.insert(service.id.clone()) {
                return Err(AppError::Catalog(format!("duplicate service id: {}", service.id)));
            }
            // Any selection must be summable, so the whole catalog has to be.
            catalog_total = catalog_total
                .checked_add(service.price_minor)
                .ok_or_else(|| {
                    AppError::Catalog(format!(
                        "price of {} overflows the catalog total",
                        service.id
                    ))
                })?;
        }
        Ok(Self { services })
    }

    pub fn from_json(s: &str) -> Result<Self, AppError> {
        let services: Vec<Service> = serde_json::from_str(s)?;
        Self::new(services)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(include_str!("../../data/services.json"))
    }

    pub fn get(&self, id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &ServiceId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
