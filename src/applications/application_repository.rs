use async_trait::async_trait;
use dashmap::DashMap;

use super::application_model::Application;
use super::application_traits::ApplicationRepositoryTrait;
use crate::errors::{Error, Result};

/// In-memory, version-checked application store.
///
/// Reference implementation of [`ApplicationRepositoryTrait`]; deployments
/// swap in a store backed by conditional writes. The version check happens
/// under the map entry's lock, so two concurrent writers cannot both win.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    applications: DashMap<String, Application>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self {
            applications: DashMap::new(),
        }
    }
}

#[async_trait]
impl ApplicationRepositoryTrait for InMemoryApplicationRepository {
    fn get_by_id(&self, id: &str) -> Result<Application> {
        self.applications
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NotFound(format!("Application '{}' not found", id)))
    }

    fn list(&self) -> Result<Vec<Application>> {
        Ok(self
            .applications
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert(&self, application: Application) -> Result<Application> {
        use dashmap::mapref::entry::Entry;

        match self.applications.entry(application.id.clone()) {
            Entry::Occupied(_) => Err(Error::Conflict(format!(
                "Application '{}' already exists",
                application.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(application.clone());
                Ok(application)
            }
        }
    }

    async fn update_versioned(
        &self,
        mut application: Application,
        expected_version: u64,
    ) -> Result<Application> {
        let mut entry = self.applications.get_mut(&application.id).ok_or_else(|| {
            Error::NotFound(format!("Application '{}' not found", application.id))
        })?;

        if entry.version != expected_version {
            return Err(Error::Conflict(format!(
                "Application '{}' was modified concurrently (expected version {}, found {})",
                application.id, expected_version, entry.version
            )));
        }

        application.version = expected_version + 1;
        *entry = application.clone();
        Ok(application)
    }
}
