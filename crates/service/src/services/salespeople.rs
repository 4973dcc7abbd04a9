use std::sync::Arc;

use models::catalog::Salesperson;
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::{CollectionStore, Insertion};

/// Contact created by [`SalespersonService::seed`].
pub const DEFAULT_SALESPERSON: (&str, &str) = ("Wahid", "62895346372918");

fn required_contact(name: &str, phone: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() || phone.trim().is_empty() {
        return Err(ServiceError::Validation("name and phone required".into()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct SalespersonService {
    store: Arc<dyn CollectionStore<Salesperson>>,
}

impl SalespersonService {
    pub fn new(store: Arc<dyn CollectionStore<Salesperson>>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Vec<Salesperson> {
        self.store.list().await
    }

    /// Name and phone are both required; either one already taken yields
    /// the existing record.
    pub async fn add(&self, name: &str, phone: &str) -> Result<Insertion<Salesperson>, ServiceError> {
        required_contact(name, phone)?;
        let outcome = self.store.insert(Salesperson::new(name, phone)).await?;
        if let Insertion::Created(s) = &outcome {
            info!(id = %s.id, name = %s.name, "salesperson added");
        }
        Ok(outcome)
    }

    /// Idempotently add the default contact.
    pub async fn seed(&self) -> Result<Insertion<Salesperson>, ServiceError> {
        let (name, phone) = DEFAULT_SALESPERSON;
        self.add(name, phone).await
    }

    /// Rename or renumber; taking another contact's name or phone is a
    /// validation error.
    pub async fn update(&self, person: Salesperson) -> Result<Salesperson, ServiceError> {
        required_contact(&person.name, &person.phone)?;
        let person = Salesperson {
            id: person.id,
            name: person.name.trim().to_string(),
            phone: person.phone.trim().to_string(),
        };
        self.store.replace(person).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.store.remove(id).await
    }
}
