//! View state of one resource's list page.
//!
//! The page is `Loading` until `mount` finishes, then `Ready`. Mutations are applied in
//! place from the API's response, never by refetching the list; failures leave the records
//! untouched and raise an error notification. Deletes are tracked per row so several rows
//! can be busy at once: callers that need concurrency use `begin_delete`/`finish_delete`
//! around their own API calls, `delete` drives both for a single row.

use super::format::clinic_offset;
use super::table::TableView;
use crate::client::{ClientError, ResourceApi};
use chrono::FixedOffset;
use std::collections::HashSet;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    fn success(message: &str) -> Self {
        Self {
            message: message.to_string(),
            severity: Severity::Success,
        }
    }

    fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            severity: Severity::Error,
        }
    }
}

/// Result of a create or edit submitted from a modal.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> MutationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Success(_))
    }
}

pub struct ListPage<R: TableView> {
    state: PageState,
    records: Vec<R::Record>,
    deleting: HashSet<i64>,
    notification: Option<Notification>,
    editing: Option<R::Record>,
    creating: bool,
    offset: FixedOffset,
}

impl<R: TableView> fmt::Debug for ListPage<R>
where
    R::Record: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListPage")
            .field("resource", &R::PATH)
            .field("state", &self.state)
            .field("records", &self.records.len())
            .field("deleting", &self.deleting)
            .field("notification", &self.notification)
            .finish()
    }
}

impl<R: TableView> Default for ListPage<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableView> ListPage<R> {
    pub fn new() -> Self {
        Self::with_offset(clinic_offset())
    }

    /// Page rendering date-times in `offset`.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            state: PageState::Loading,
            records: Vec::new(),
            deleting: HashSet::new(),
            notification: None,
            editing: None,
            creating: false,
            offset,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Loads every record with exactly one `list` call. A failure still leaves the page
    /// `Ready`, empty, with an error notification.
    pub async fn mount<A>(&mut self, api: &A)
    where
        A: ResourceApi<R> + ?Sized,
    {
        self.state = PageState::Loading;
        match api.list().await {
            Ok(records) => self.records = records,
            Err(e) => {
                tracing::warn!(resource = R::PATH, error = %e, "list failed");
                self.records.clear();
                self.notification = Some(Notification::error(R::MESSAGES.load_failed));
            }
        }
        self.state = PageState::Ready;
    }

    /// Whether row `id` has a delete in flight; its delete control is disabled.
    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting.contains(&id)
    }

    /// Marks row `id` busy. `false` when a delete for it is already in flight.
    pub fn begin_delete(&mut self, id: i64) -> bool {
        self.deleting.insert(id)
    }

    /// Applies the outcome of a delete started with `begin_delete`.
    pub fn finish_delete(&mut self, id: i64, result: Result<(), ClientError>) {
        self.deleting.remove(&id);
        match result {
            Ok(()) => {
                self.records.retain(|r| R::id(r) != id);
                self.notification = Some(Notification::success(R::MESSAGES.deleted));
            }
            Err(e) => {
                tracing::warn!(resource = R::PATH, id, error = %e, "delete failed");
                self.notification = Some(Notification::error(R::MESSAGES.delete_failed));
            }
        }
    }

    /// Deletes row `id`; ignored while a delete for the same row is in flight.
    pub async fn delete<A>(&mut self, api: &A, id: i64)
    where
        A: ResourceApi<R> + ?Sized,
    {
        if !self.begin_delete(id) {
            return;
        }
        let result = api.delete(id).await;
        self.finish_delete(id, result);
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn open_create(&mut self) {
        self.creating = true;
    }

    pub fn close_create(&mut self) {
        self.creating = false;
    }

    /// Record currently open in the edit modal.
    pub fn editing(&self) -> Option<&R::Record> {
        self.editing.as_ref()
    }

    /// Opens the edit modal for row `id`; `false` when the row is not listed.
    pub fn open_edit(&mut self, id: i64) -> bool {
        self.editing = self.records.iter().find(|r| R::id(r) == id).cloned();
        self.editing.is_some()
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    /// Creates a record and appends it. The create modal closes on success.
    pub async fn create<A>(&mut self, api: &A, input: &R::Input) -> MutationOutcome<R::Record>
    where
        A: ResourceApi<R> + ?Sized,
    {
        match api.create(input).await {
            Ok(record) => {
                self.records.push(record.clone());
                self.creating = false;
                self.notification = Some(Notification::success(R::MESSAGES.created));
                MutationOutcome::Success(record)
            }
            Err(e) => {
                tracing::warn!(resource = R::PATH, error = %e, "create failed");
                self.notification = Some(Notification::error(R::MESSAGES.create_failed));
                MutationOutcome::Failure(e.to_string())
            }
        }
    }

    /// Replaces row `id` with the API's response. The edit modal closes on success.
    pub async fn update<A>(&mut self, api: &A, id: i64, input: &R::Input) -> MutationOutcome<R::Record>
    where
        A: ResourceApi<R> + ?Sized,
    {
        match api.update(id, input).await {
            Ok(record) => {
                let updated_id = R::id(&record);
                match self.records.iter_mut().find(|r| R::id(r) == updated_id) {
                    Some(slot) => *slot = record.clone(),
                    None => self.records.push(record.clone()),
                }
                self.editing = None;
                self.notification = Some(Notification::success(R::MESSAGES.updated));
                MutationOutcome::Success(record)
            }
            Err(e) => {
                tracing::warn!(resource = R::PATH, id, error = %e, "update failed");
                self.notification = Some(Notification::error(R::MESSAGES.update_failed));
                MutationOutcome::Failure(e.to_string())
            }
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        R::HEADERS
    }

    pub fn title(&self) -> &'static str {
        R::MESSAGES.title
    }

    /// Shown instead of rows when the list is empty.
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.state == PageState::Ready && self.records.is_empty() {
            Some(R::MESSAGES.empty)
        } else {
            None
        }
    }

    /// Row id and formatted cells, in list order.
    pub fn rows(&self) -> Vec<(i64, Vec<String>)> {
        self.records
            .iter()
            .map(|r| (R::id(r), R::cells(r, self.offset)))
            .collect()
    }
}
