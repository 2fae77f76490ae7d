use crate::records::{RecordChanges, RecordId};
use crate::render::RenderContext;

/// An edit or delete waiting for the account password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Edit { id: RecordId, changes: RecordChanges },
    Delete { id: RecordId },
}

/// Per-session state the operations share.
///
/// Sign-out resets the user fields. The render context lives for the whole
/// session so generation tokens never go backwards.
#[derive(Debug, Default)]
pub struct Session {
    current_user: Option<String>,
    pending: Option<PendingAction>,
    staged_image: Option<String>,
    render: RenderContext,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn set_current_user(&mut self, user: Option<String>) {
        self.current_user = user;
    }

    pub fn request(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn stage_image(&mut self, data_url: String) {
        self.staged_image = Some(data_url);
    }

    pub fn take_staged_image(&mut self) -> Option<String> {
        self.staged_image.take()
    }

    pub fn render(&self) -> &RenderContext {
        &self.render
    }

    pub fn sign_out(&mut self) {
        self.current_user = None;
        self.pending = None;
        self.staged_image = None;
    }
}
