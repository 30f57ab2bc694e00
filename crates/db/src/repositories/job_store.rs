//! Keyed storage of support calls, the single source of truth for status.
//!
//! Every status write goes through a guarded transition that checks the
//! current status under the write lock, so concurrent callers can never
//! regress or skip a status.

use std::collections::HashMap;

use callroute_core::error::CoreError;
use callroute_core::status::JobStatus;
use callroute_core::types::{DuplicatePolicy, JobId};
use tokio::sync::RwLock;

use crate::models::job::Job;

/// Result of [`JobStore::insert`].
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// No record existed; the new one was stored.
    Created(Job),
    /// A record existed and was replaced.
    Replaced(Job),
    /// A record existed and was kept; carries the existing record.
    Ignored(Job),
}

impl InsertOutcome {
    pub fn job(&self) -> &Job {
        match self {
            InsertOutcome::Created(job)
            | InsertOutcome::Replaced(job)
            | InsertOutcome::Ignored(job) => job,
        }
    }
}

/// Result of correlating a provider callback with a stored support call.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    /// The call was `Transcribing`; the result is stored and it is now `Processing`.
    Matched(Job),
    /// No support call carries this provider request id.
    Unmatched,
    /// The call already moved past `Transcribing`; nothing was changed.
    AlreadyReceived(Job),
}

#[derive(Default)]
struct StoreInner {
    jobs: HashMap<JobId, Job>,
    /// provider request id -> job id
    by_request_id: HashMap<String, JobId>,
}

impl StoreInner {
    /// Insert or overwrite a record, keeping the request-id index consistent.
    fn put(&mut self, job: Job) -> Result<Option<Job>, CoreError> {
        if let Some(request_id) = &job.provider_request_id {
            if let Some(owner) = self.by_request_id.get(request_id) {
                if owner != &job.id {
                    return Err(CoreError::Conflict(format!(
                        "Provider request id {request_id} already belongs to {owner}"
                    )));
                }
            }
        }

        let id = job.id.clone();
        let request_id = job.provider_request_id.clone();
        let previous = self.jobs.insert(id.clone(), job);

        if let Some(old) = previous.as_ref().and_then(|p| p.provider_request_id.as_ref()) {
            self.by_request_id.remove(old);
        }
        if let Some(request_id) = request_id {
            self.by_request_id.insert(request_id, id);
        }

        Ok(previous)
    }
}

/// Move a job one step forward, refusing anything but the immediate successor.
fn advance(job: &mut Job, to: JobStatus) -> Result<(), CoreError> {
    if !job.status.can_advance_to(to) {
        return Err(CoreError::InvalidTransition {
            id: job.id.clone(),
            from: job.status,
            to,
        });
    }
    job.status = to;
    job.updated_at = chrono::Utc::now();
    Ok(())
}

/// In-memory support call store.
pub struct JobStore {
    inner: RwLock<StoreInner>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Insert or overwrite a record by id.
    ///
    /// Fails with `Conflict` if the record carries a provider request id that
    /// already belongs to a different support call.
    pub async fn put(&self, job: Job) -> Result<(), CoreError> {
        self.inner.write().await.put(job).map(|_| ())
    }

    /// Insert a new record, resolving an id collision with `policy`.
    ///
    /// `Overwrite` only replaces a record still in `Created`; once a provider
    /// request is outstanding the collision is a `Conflict` under any policy
    /// except `Ignore`.
    pub async fn insert(
        &self,
        job: Job,
        policy: DuplicatePolicy,
    ) -> Result<InsertOutcome, CoreError> {
        let mut inner = self.inner.write().await;
        let existing = inner.jobs.get(&job.id).cloned();

        match (existing, policy) {
            (None, _) => {
                inner.put(job.clone())?;
                Ok(InsertOutcome::Created(job))
            }
            (Some(_), DuplicatePolicy::Reject) => Err(CoreError::Conflict(format!(
                "Support call {} already exists",
                job.id
            ))),
            (Some(existing), DuplicatePolicy::Ignore) => Ok(InsertOutcome::Ignored(existing)),
            (Some(existing), DuplicatePolicy::Overwrite) => {
                if existing.status != JobStatus::Created {
                    return Err(CoreError::Conflict(format!(
                        "Support call {} is {} and cannot be overwritten",
                        job.id, existing.status
                    )));
                }
                inner.put(job.clone())?;
                Ok(InsertOutcome::Replaced(job))
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<Job> {
        self.inner.read().await.jobs.get(id).cloned()
    }

    /// Indexed lookup by provider request id.
    pub async fn find_by_provider_request_id(&self, request_id: &str) -> Option<Job> {
        let inner = self.inner.read().await;
        inner
            .by_request_id
            .get(request_id)
            .and_then(|id| inner.jobs.get(id))
            .cloned()
    }

    pub async fn count_by_status(&self, status: JobStatus) -> usize {
        self.inner
            .read()
            .await
            .jobs
            .values()
            .filter(|job| job.status == status)
            .count()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.jobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.jobs.is_empty()
    }

    /// Append a tag to an existing record.
    pub async fn append_tag(&self, id: &str, tag: &str) -> Result<Job, CoreError> {
        let mut inner = self.inner.write().await;
        let job = inner
            .jobs
            .get_mut(id)
            .ok_or_else(|| CoreError::JobNotFound { id: id.to_string() })?;
        job.tags.push(tag.to_string());
        job.updated_at = chrono::Utc::now();
        Ok(job.clone())
    }

    /// `Created -> Transcribing`, recording the provider request id.
    pub async fn mark_transcribing(&self, id: &str, request_id: &str) -> Result<Job, CoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        if let Some(owner) = inner.by_request_id.get(request_id) {
            if owner != id {
                return Err(CoreError::Conflict(format!(
                    "Provider request id {request_id} already belongs to {owner}"
                )));
            }
        }

        let job = inner
            .jobs
            .get_mut(id)
            .ok_or_else(|| CoreError::JobNotFound { id: id.to_string() })?;
        advance(job, JobStatus::Transcribing)?;
        job.provider_request_id = Some(request_id.to_string());

        inner
            .by_request_id
            .insert(request_id.to_string(), id.to_string());
        Ok(job.clone())
    }

    /// `Transcribing -> Processing` for the call owning `request_id`,
    /// storing the provider result.
    pub async fn mark_processing(
        &self,
        request_id: &str,
        result: serde_json::Value,
    ) -> Result<Correlation, CoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let Some(id) = inner.by_request_id.get(request_id) else {
            return Ok(Correlation::Unmatched);
        };
        let job = inner.jobs.get_mut(id).ok_or_else(|| {
            CoreError::Internal(format!(
                "Request id index points at missing support call {id}"
            ))
        })?;

        if job.status != JobStatus::Transcribing {
            return Ok(Correlation::AlreadyReceived(job.clone()));
        }

        advance(job, JobStatus::Processing)?;
        job.provider_result = Some(result);
        Ok(Correlation::Matched(job.clone()))
    }

    /// `Processing -> Processed`.
    pub async fn mark_processed(&self, id: &str) -> Result<Job, CoreError> {
        let mut inner = self.inner.write().await;
        let job = inner
            .jobs
            .get_mut(id)
            .ok_or_else(|| CoreError::JobNotFound { id: id.to_string() })?;
        advance(job, JobStatus::Processed)?;
        Ok(job.clone())
    }

    /// All records, oldest first.
    pub async fn snapshot(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.inner.read().await.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        jobs
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
