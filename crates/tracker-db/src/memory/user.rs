//! In-memory user repository

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracker_types::UserId;

use crate::error::{DbError, DbResult};
use crate::models::{CreateUser, UserRow};
use crate::repo::UserRepository;

/// In-memory user repository
///
/// Cheap to clone; clones share the same maps.
#[derive(Default, Clone)]
pub struct MemoryUserRepository {
    /// id -> (insertion sequence, row)
    users: Arc<DashMap<UserId, (u64, UserRow)>>,
    by_email: Arc<DashMap<String, UserId>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().1.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let Some(id) = self.by_email.get(email).map(|r| *r.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        // The email entry stays locked until the row is in place, so two
        // concurrent registrations for one address cannot both succeed.
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(email = %user.email, "Rejecting duplicate email");
                Err(DbError::Conflict(format!("email {} already registered", user.email)))
            }
            Entry::Vacant(slot) => {
                let row = UserRow {
                    id: UserId::new(),
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    role: user.role,
                    created_at: Utc::now(),
                };
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                self.users.insert(row.id, (seq, row.clone()));
                slot.insert(row.id);
                Ok(row)
            }
        }
    }

    async fn list(&self) -> DbResult<Vec<UserRow>> {
        let mut rows: Vec<(u64, UserRow)> =
            self.users.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_types::Role;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Tester,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryUserRepository::new();
        let created = repo.create(new_user("a@x.com")).await.unwrap();

        let by_email = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        let result = repo.create(new_user("a@x.com")).await;
        assert!(matches!(result, Err(DbError::Conflict(_))));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        assert!(repo.find_by_email("A@X.COM").await.unwrap().is_none());
        assert!(repo.create(new_user("A@X.COM")).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let repo = MemoryUserRepository::new();
        for i in 0..5 {
            repo.create(new_user(&format!("u{i}@x.com"))).await.unwrap();
        }
        let emails: Vec<String> = repo.list().await.unwrap().into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["u0@x.com", "u1@x.com", "u2@x.com", "u3@x.com", "u4@x.com"]);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration_single_winner() {
        let repo = MemoryUserRepository::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move { repo.create(new_user("race@x.com")).await }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let repo = MemoryUserRepository::new();
        assert!(repo.find_by_id(UserId::new()).await.unwrap().is_none());
        assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
    }
}
