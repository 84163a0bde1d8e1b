//! Per-request context threaded through every service and repository call.
//!
//! A [`RequestContext`] carries the caller's request id (for log correlation)
//! and an optional deadline. Storage round trips run through
//! [`RequestContext::run`], which fails with [`DatabaseError::DeadlineExceeded`]
//! once the deadline has passed.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::common::{DatabaseError, DatabaseResult};

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: None,
        }
    }

    /// Context with a generated id and no deadline (start-up tasks, tests).
    pub fn background() -> Self {
        Self::new(uuid::Uuid::now_v7().to_string())
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Keeps the earlier of the existing and the new deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Run one storage round trip under this context's deadline.
    #[cfg(feature = "postgres")]
    pub async fn run<F, T>(&self, operation: F) -> DatabaseResult<T>
    where
        F: Future<Output = Result<T, sea_orm::DbErr>>,
    {
        self.guard(async { operation.await.map_err(DatabaseError::from) })
            .await
    }

    /// Deadline enforcement for futures that already yield [`DatabaseResult`].
    pub async fn guard<F, T>(&self, operation: F) -> DatabaseResult<T>
    where
        F: Future<Output = DatabaseResult<T>>,
    {
        let Some(deadline) = self.deadline else {
            return operation.await;
        };

        if Instant::now() >= deadline {
            tracing::warn!(request_id = %self.request_id, "Deadline passed before storage call");
            return Err(DatabaseError::DeadlineExceeded);
        }

        match tokio::time::timeout_at(deadline, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(request_id = %self.request_id, "Storage call exceeded request deadline");
                Err(DatabaseError::DeadlineExceeded)
            }
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}
