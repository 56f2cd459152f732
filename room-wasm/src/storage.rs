use room_core::{LayoutStore, StoreError};
use web_sys::{Storage, Window};

/// [`LayoutStore`] backed by `window.localStorage`.
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn open(window: &Window) -> Result<Self, StoreError> {
        match window.local_storage() {
            Ok(Some(storage)) => Ok(LocalStore { storage }),
            Ok(None) => Err(StoreError::Unavailable("localStorage is disabled".to_string())),
            Err(e) => Err(StoreError::Unavailable(format!("{:?}", e))),
        }
    }
}

impl LayoutStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(|e| StoreError::Read {
            key: key.to_string(),
            message: format!("{:?}", e),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(|e| StoreError::Write {
            key: key.to_string(),
            message: format!("{:?}", e),
        })
    }
}
