//! The users screen: collection, grid rows, and the two modals.
//!
//! # Design
//! `RecordTable` owns the local collection and treats it as the only thing
//! to render from. Mutations are applied optimistically from what the
//! screen sent, never re-fetched, so a request the server half-applied can
//! leave the two out of step. Backend failures are logged and otherwise
//! ignored; the one visible failure is the initial load banner.
//!
//! Each backend call is exposed as a `begin_*` / `finish_*` pair plus a
//! blocking wrapper that runs the pair through a `Transport`.

use crate::client::UserClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, FormError};
use crate::fetch::DataFetcher;
use crate::form::{CreateForm, EditForm};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{parse_birthday, User};
use crate::view::GridRow;

/// Banner shown when the initial load failed.
pub const LOAD_ERROR_BANNER: &str = "*Fetch data error, please reload page";

/// Which modal is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Create,
    Edit,
}

/// What a pending modal submit will apply once its response lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    /// The full record the PUT carried.
    Edit(User),
}

/// A modal submit waiting for its response.
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    pub target: SubmitTarget,
    pub request: HttpRequest,
}

/// An inline row update waiting for its response.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    pub row: User,
    pub request: HttpRequest,
}

/// What a grid row edit turned into.
#[derive(Debug, Clone)]
pub enum InlineEdit {
    /// Nothing to send; hand this row back to the grid.
    Settled(User),
    /// Send `request`, then call `finish_inline_update`.
    Pending(PendingUpdate),
}

#[derive(Debug)]
pub struct RecordTable {
    client: UserClient,
    fetcher: DataFetcher<User>,
    users: Vec<User>,
    modal: Modal,
    create_form: CreateForm,
    edit_form: Option<EditForm>,
}

impl RecordTable {
    pub fn new(config: &ClientConfig) -> Self {
        let client = UserClient::new(config);
        let fetcher = DataFetcher::new(client.list_url());
        Self {
            client,
            fetcher,
            users: Vec::new(),
            modal: Modal::Closed,
            create_form: CreateForm::new(),
            edit_form: None,
        }
    }

    pub fn client(&self) -> &UserClient {
        &self.client
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn rows(&self) -> Vec<GridRow> {
        self.users.iter().map(GridRow::from).collect()
    }

    pub fn find(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// The list request, once per mount.
    pub fn mount(&mut self) -> Option<HttpRequest> {
        self.fetcher.begin()
    }

    /// Replace the collection wholesale when data arrives.
    pub fn on_loaded(&mut self, outcome: Result<HttpResponse, ApiError>) {
        if self.fetcher.settle(outcome) {
            self.users = self.fetcher.data().to_vec();
            tracing::info!(count = self.users.len(), "users loaded");
        }
    }

    pub fn load<T: Transport + ?Sized>(&mut self, transport: &T) {
        if let Some(request) = self.mount() {
            let outcome = transport.execute(&request);
            self.on_loaded(outcome);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.loading()
    }

    pub fn load_error_banner(&self) -> Option<&'static str> {
        (!self.fetcher.error().is_empty()).then_some(LOAD_ERROR_BANNER)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    pub fn begin_delete(&self, id: &str) -> HttpRequest {
        self.client.build_delete_user(id)
    }

    /// Drop the row on success; log and keep it otherwise.
    pub fn finish_delete(&mut self, id: &str, outcome: Result<HttpResponse, ApiError>) -> bool {
        match outcome.and_then(|response| self.client.parse_delete_user(response)) {
            Ok(()) => {
                self.users.retain(|u| u.id != id);
                tracing::info!(user_id = %id, "user deleted");
                true
            }
            Err(err) => {
                tracing::warn!(user_id = %id, error = %err, "delete user failed");
                false
            }
        }
    }

    pub fn delete<T: Transport + ?Sized>(&mut self, transport: &T, id: &str) -> bool {
        let request = self.begin_delete(id);
        let outcome = transport.execute(&request);
        self.finish_delete(id, outcome)
    }

    // -----------------------------------------------------------------------
    // Modals
    // -----------------------------------------------------------------------

    pub fn modal(&self) -> Modal {
        self.modal
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Create;
    }

    /// Open the edit modal seeded from `user`.
    ///
    /// Returns `false`, leaving the modal as it was, while the edit form is
    /// still submitting a different record.
    pub fn begin_edit(&mut self, user: &User) -> bool {
        match self.edit_form.as_mut() {
            Some(form) => {
                if !form.reseed(user) {
                    return false;
                }
            }
            None => self.edit_form = Some(EditForm::new(user)),
        }
        self.modal = Modal::Edit;
        true
    }

    /// Dismiss the modal; typed input survives.
    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// The modal's Cancel button: the create form is also cleared, unless
    /// its submit is still in flight.
    pub fn cancel_modal(&mut self) {
        if self.modal == Modal::Create {
            self.create_form.reset();
        }
        self.modal = Modal::Closed;
    }

    pub fn create_form(&self) -> &CreateForm {
        &self.create_form
    }

    pub fn create_form_mut(&mut self) -> &mut CreateForm {
        &mut self.create_form
    }

    pub fn edit_form(&self) -> Option<&EditForm> {
        self.edit_form.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.edit_form.as_mut()
    }

    /// Validate and start submitting whichever modal is open. `Ok(None)` when
    /// no modal is open.
    pub fn begin_modal_submit(&mut self) -> Result<Option<PendingSubmit>, FormError> {
        let pending = match (self.modal, self.edit_form.as_mut()) {
            (Modal::Create, _) => PendingSubmit {
                target: SubmitTarget::Create,
                request: self.create_form.begin_submit(&self.client)?,
            },
            (Modal::Edit, Some(form)) => {
                let submit = form.begin_submit(&self.client)?;
                PendingSubmit {
                    target: SubmitTarget::Edit(submit.sent),
                    request: submit.request,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(pending))
    }

    /// Apply a modal submit's outcome. Edits merge the record that was sent,
    /// whatever the form holds now.
    ///
    /// On success the modal closes only if it is still the one that submitted.
    pub fn finish_modal_submit(
        &mut self,
        target: &SubmitTarget,
        outcome: Result<HttpResponse, ApiError>,
    ) -> bool {
        let (done, owns_modal) = match target {
            SubmitTarget::Create => {
                let done = self.create_form.finish_submit(&self.client, outcome, &mut self.users);
                (done, self.modal == Modal::Create)
            }
            SubmitTarget::Edit(sent) => match self.edit_form.as_mut() {
                Some(edit) => {
                    let done = edit.finish_submit(&self.client, sent, outcome, &mut self.users);
                    let owns_modal = self.modal == Modal::Edit && edit.source().id == sent.id;
                    (done, owns_modal)
                }
                None => (false, false),
            },
        };
        if done && owns_modal {
            self.modal = Modal::Closed;
        }
        done
    }

    pub fn submit_modal<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
    ) -> Result<bool, FormError> {
        match self.begin_modal_submit()? {
            Some(pending) => {
                let outcome = transport.execute(&pending.request);
                Ok(self.finish_modal_submit(&pending.target, outcome))
            }
            None => Ok(false),
        }
    }

    // -----------------------------------------------------------------------
    // Inline grid edits
    // -----------------------------------------------------------------------

    /// Decide whether an edited grid row needs a request.
    pub fn begin_inline_update(&self, edited: User) -> InlineEdit {
        let Some(original) = self.find(&edited.id) else {
            tracing::debug!(user_id = %edited.id, "inline edit on unknown row ignored");
            return InlineEdit::Settled(edited);
        };
        if !row_changed(original, &edited) {
            return InlineEdit::Settled(edited);
        }
        match self.client.build_update_user(&edited) {
            Ok(request) => InlineEdit::Pending(PendingUpdate { row: edited, request }),
            Err(err) => {
                tracing::warn!(user_id = %edited.id, error = %err, "inline update not sent");
                InlineEdit::Settled(original.clone())
            }
        }
    }

    /// Store the edited row on success. On failure hand back the row the
    /// collection still holds so the grid reverts.
    pub fn finish_inline_update(
        &mut self,
        pending: PendingUpdate,
        outcome: Result<HttpResponse, ApiError>,
    ) -> User {
        let row = pending.row;
        match outcome.and_then(|response| self.client.parse_update_user(response)) {
            Ok(()) => {
                if let Some(slot) = self.users.iter_mut().find(|u| u.id == row.id) {
                    *slot = row.clone();
                }
                tracing::info!(user_id = %row.id, "user updated inline");
                row
            }
            Err(err) => {
                tracing::warn!(user_id = %row.id, error = %err, "inline update failed");
                self.find(&row.id).cloned().unwrap_or(row)
            }
        }
    }

    pub fn inline_update<T: Transport + ?Sized>(&mut self, transport: &T, edited: User) -> User {
        match self.begin_inline_update(edited) {
            InlineEdit::Settled(row) => row,
            InlineEdit::Pending(pending) => {
                let outcome = transport.execute(&pending.request);
                self.finish_inline_update(pending, outcome)
            }
        }
    }
}

/// Birthdays compare by calendar day so `2000-01-01` and
/// `2000-01-01T00:00:00.000Z` count as the same value.
fn row_changed(original: &User, edited: &User) -> bool {
    let birthday_changed = match (
        parse_birthday(&original.birthday),
        parse_birthday(&edited.birthday),
    ) {
        (Some(a), Some(b)) => a != b,
        _ => original.birthday != edited.birthday,
    };
    original.name != edited.name
        || original.address != edited.address
        || original.phone != edited.phone
        || original.gender != edited.gender
        || birthday_changed
}
