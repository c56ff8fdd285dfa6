use std::collections::HashMap;

use uuid::Uuid;

use crate::{assets::Handle, error::AssetError};

/// Message sent from an IO worker back to whoever owns the [`AssetLookup`].
#[derive(Debug)]
pub enum AssetEvent<T> {
    Loaded { id: Uuid, path: String, asset: T },
    Failed { id: Uuid, path: String, error: AssetError },
}

impl<T> AssetEvent<T> {
    pub fn id(&self) -> Uuid {
        match self {
            AssetEvent::Loaded { id, .. } | AssetEvent::Failed { id, .. } => *id,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            AssetEvent::Loaded { path, .. } | AssetEvent::Failed { path, .. } => path,
        }
    }

    pub fn into_result(self) -> Result<T, AssetError> {
        match self {
            AssetEvent::Loaded { asset, .. } => Ok(asset),
            AssetEvent::Failed { error, .. } => Err(error),
        }
    }
}

/// Finished loads, keyed by handle.
#[derive(Debug)]
pub struct AssetLookup<T> {
    loaded: HashMap<Uuid, T>,
    failed: HashMap<Uuid, AssetError>,
}

impl<T> Default for AssetLookup<T> {
    fn default() -> Self {
        Self {
            loaded: HashMap::new(),
            failed: HashMap::new(),
        }
    }
}

impl<T> AssetLookup<T> {
    pub fn apply(&mut self, event: AssetEvent<T>) {
        match event {
            AssetEvent::Loaded { id, path, asset } => {
                log::debug!("Asset ready: {path}");
                self.failed.remove(&id);
                self.loaded.insert(id, asset);
            }
            AssetEvent::Failed { id, path, error } => {
                log::warn!("Asset failed: {path}: {error}");
                self.loaded.remove(&id);
                self.failed.insert(id, error);
            }
        }
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.loaded.get(&handle.id)
    }

    pub fn error(&self, handle: Handle<T>) -> Option<&AssetError> {
        self.failed.get(&handle.id)
    }

    /// True once the handle either loaded or failed.
    pub fn is_settled(&self, handle: Handle<T>) -> bool {
        self.loaded.contains_key(&handle.id) || self.failed.contains_key(&handle.id)
    }

    /// Removes and returns the outcome for `handle`, if it has settled.
    pub fn take(&mut self, handle: Handle<T>) -> Option<Result<T, AssetError>> {
        if let Some(asset) = self.loaded.remove(&handle.id) {
            return Some(Ok(asset));
        }
        self.failed.remove(&handle.id).map(Err)
    }
}
