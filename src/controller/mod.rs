//! Controller module - Application logic and event handling
//!
//! Organized into submodules by responsibility:
//!
//! - `input`: Key event handling, routed to the topmost layer first
//! - `navigation`: Tabs, list entries, detail overlays and the player
//! - `actions`: Subscriptions, sharing, accounts and opening videos by id

mod actions;
mod input;
mod navigation;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{AppModel, CatalogError};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>) -> Self {
        Self { model }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        match error.downcast_ref::<CatalogError>() {
            Some(CatalogError::NotFound { kind, .. }) => {
                format!("That {} is no longer available.", kind)
            }
            Some(CatalogError::Unsupported(what)) => {
                format!("This account's service does not support {}.", what)
            }
            None => format!("Error: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_maps_catalog_errors() {
        let err: anyhow::Error = CatalogError::NotFound { kind: "video", id: "x".into() }.into();
        assert_eq!(AppController::format_error(&err), "That video is no longer available.");

        let err = anyhow::anyhow!("disk full");
        assert_eq!(AppController::format_error(&err), "Error: disk full");
    }
}
