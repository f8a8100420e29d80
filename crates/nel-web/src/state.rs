//! Shared application state
//!
//! The linker is built once at startup and shared read-only by every
//! request.

use std::sync::Arc;

use mesh_nel::EntityLinker;

#[derive(Clone)]
pub struct AppState {
    pub linker: Arc<EntityLinker>,
}

impl AppState {
    pub fn new(linker: EntityLinker) -> Self {
        Self {
            linker: Arc::new(linker),
        }
    }
}
