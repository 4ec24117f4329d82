use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::SessionId,
    protocol::{Session, ValidationItem, ValidationReport},
};
use tokio::sync::RwLock;

/// Read-only view of schedule data supplied by the host.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn get_session(&self, id: SessionId) -> Option<Session>;
    async fn list_validation_checks(&self) -> Vec<ValidationItem>;

    async fn validation_report(&self) -> ValidationReport {
        ValidationReport::new(self.list_validation_checks().await)
    }
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<SessionId, Session>,
    checks: Vec<ValidationItem>,
}

/// In-memory repository for hosts without a backend yet, and for tests.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(sessions: Vec<Session>, checks: Vec<ValidationItem>) -> Self {
        let inner = Inner {
            sessions: sessions.into_iter().map(|s| (s.id, s)).collect(),
            checks,
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub async fn put_session(&self, session: Session) {
        self.inner.write().await.sessions.insert(session.id, session);
    }

    pub async fn set_checks(&self, checks: Vec<ValidationItem>) {
        self.inner.write().await.checks = checks;
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryRepository {
    async fn get_session(&self, id: SessionId) -> Option<Session> {
        self.inner.read().await.sessions.get(&id).cloned()
    }

    async fn list_validation_checks(&self) -> Vec<ValidationItem> {
        self.inner.read().await.checks.clone()
    }
}
