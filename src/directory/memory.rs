//! In-memory user directory for tests.

use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::{Category, UserKind, UserProfile};

use super::{DirectoryError, UserDirectory};

#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: Mutex<Vec<UserProfile>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, profile: UserProfile) {
        self.users.lock().expect("directory mutex poisoned").push(profile);
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, DirectoryError> {
        let users = self.users.lock().expect("directory mutex poisoned");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_vendors_by_categories(
        &self,
        categories: &[Category],
    ) -> Result<Vec<UserProfile>, DirectoryError> {
        let users = self.users.lock().expect("directory mutex poisoned");
        Ok(users
            .iter()
            .filter(|u| {
                u.kind == UserKind::Vendor
                    && u.interest_categories
                        .iter()
                        .any(|c| categories.contains(c))
            })
            .cloned()
            .collect())
    }
}
