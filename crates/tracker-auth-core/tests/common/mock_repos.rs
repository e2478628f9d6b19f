//! Misbehaving repositories for failure-path tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::time::Duration;
use tracker_db::{CreateUser, DbError, DbResult, MemoryUserRepository, UserRepository, UserRow};
use tracker_types::UserId;

/// Delegates to the in-memory store after sleeping on every call
#[derive(Default, Clone)]
pub struct SlowUserRepository {
    inner: MemoryUserRepository,
    delay: Duration,
}

impl SlowUserRepository {
    #[allow(dead_code)]
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryUserRepository::default(),
            delay,
        }
    }
}

#[async_trait]
impl UserRepository for SlowUserRepository {
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_email(email).await
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(user).await
    }

    async fn list(&self) -> DbResult<Vec<UserRow>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list().await
    }
}

/// Every call fails as if the backing store were down
#[derive(Default, Clone)]
pub struct FailingUserRepository;

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn find_by_id(&self, _: UserId) -> DbResult<Option<UserRow>> {
        Err(DbError::Unavailable("store offline".into()))
    }

    async fn find_by_email(&self, _: &str) -> DbResult<Option<UserRow>> {
        Err(DbError::Unavailable("store offline".into()))
    }

    async fn create(&self, _: CreateUser) -> DbResult<UserRow> {
        Err(DbError::Unavailable("store offline".into()))
    }

    async fn list(&self) -> DbResult<Vec<UserRow>> {
        Err(DbError::Unavailable("store offline".into()))
    }
}
