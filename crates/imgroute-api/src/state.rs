//! Application state shared by every handler.

use crate::services::ImageResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: ImageResolver,
}

impl AppState {
    pub fn new(resolver: ImageResolver) -> Self {
        Self { resolver }
    }
}
