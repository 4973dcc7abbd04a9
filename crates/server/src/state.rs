use std::sync::Arc;

use service::Catalog;

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<Catalog>,
}

impl ServerState {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog: Arc::new(catalog) }
    }
}
