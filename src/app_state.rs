use std::sync::Arc;

use crate::{library::LibraryStore, reupload::Reuploader};

#[derive(Clone)]
pub struct AppState {
    pub reuploader: Arc<Reuploader>,
    pub library: Arc<LibraryStore>,
}

impl AppState {
    pub fn new(reuploader: Reuploader) -> Self {
        let library = reuploader.library().clone();
        Self {
            reuploader: Arc::new(reuploader),
            library,
        }
    }
}
