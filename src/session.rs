//! Ephemeral session state for the presentation layer.
//!
//! The session is an explicit value passed into and returned from each
//! UI transition; nothing here is ever persisted, and the core
//! (store/service) holds no state between calls. Login is a name-only
//! stamp with no credential verification.

/// Sender name used when nobody is logged in.
pub const GUEST_USER: &str = "guest";

/// Which page the single-page UI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Board,
    Chat,
}

/// The full view state: current page, selected task, chat draft, and
/// the logged-in user name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    user: Option<String>,
    page: Page,
    selected: Option<String>,
    draft: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session pre-stamped with a user name, for non-interactive entry
    /// points (`--user`). Blank names leave the session logged out.
    pub fn with_user(name: Option<&str>) -> Self {
        match name {
            Some(name) => Self::new().login(name),
            None => Self::new(),
        }
    }

    /// Stamp the session with a user name. Blank names are ignored.
    pub fn login(mut self, name: &str) -> Self {
        let name = name.trim();
        if !name.is_empty() {
            self.user = Some(name.to_string());
        }
        self
    }

    /// Clear the user and everything tied to the old identity: page,
    /// selection, and draft all reset.
    pub fn logout(self) -> Self {
        Self::new()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// The current user name, or the guest placeholder.
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(GUEST_USER)
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selected_task(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Switch to the chat page for one task, starting a fresh draft.
    pub fn open_chat(mut self, task_id: &str) -> Self {
        self.page = Page::Chat;
        self.selected = Some(task_id.to_string());
        self.draft.clear();
        self
    }

    /// Return to the board, dropping selection and draft.
    pub fn close_chat(mut self) -> Self {
        self.page = Page::Board;
        self.selected = None;
        self.draft.clear();
        self
    }

    /// Replace the pending chat input text.
    pub fn with_draft(mut self, draft: String) -> Self {
        self.draft = draft;
        self
    }

    /// Take the draft out of the session (used after a send), leaving
    /// the input box cleared.
    pub fn take_draft(mut self) -> (Self, String) {
        let draft = std::mem::take(&mut self.draft);
        (self, draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_guest_on_board() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert_eq!(session.user(), GUEST_USER);
        assert_eq!(session.page(), Page::Board);
        assert!(session.selected_task().is_none());
    }

    #[test]
    fn login_trims_and_ignores_blank() {
        let session = Session::new().login("  mika  ");
        assert_eq!(session.user(), "mika");

        let still_guest = Session::new().login("   ");
        assert!(!still_guest.is_logged_in());
    }

    #[test]
    fn logout_resets_everything() {
        let session = Session::new()
            .login("mika")
            .open_chat("42")
            .with_draft("half-typed".to_string());

        let session = session.logout();
        assert!(!session.is_logged_in());
        assert_eq!(session.page(), Page::Board);
        assert!(session.selected_task().is_none());
        assert!(session.draft().is_empty());
    }

    #[test]
    fn chat_navigation_round_trip() {
        let session = Session::new().login("mika").open_chat("42");
        assert_eq!(session.page(), Page::Chat);
        assert_eq!(session.selected_task(), Some("42"));

        let session = session.close_chat();
        assert_eq!(session.page(), Page::Board);
        assert!(session.selected_task().is_none());
    }

    #[test]
    fn opening_chat_clears_a_stale_draft() {
        let session = Session::new()
            .open_chat("1")
            .with_draft("for task one".to_string())
            .open_chat("2");
        assert!(session.draft().is_empty());
    }

    #[test]
    fn take_draft_clears_the_input() {
        let session = Session::new().open_chat("1").with_draft("hello".to_string());
        let (session, draft) = session.take_draft();
        assert_eq!(draft, "hello");
        assert!(session.draft().is_empty());
    }
}
