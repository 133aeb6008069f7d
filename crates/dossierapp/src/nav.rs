//! # Navigation Session
//!
//! A front end drives the records through a small set of pages. Instead of
//! ambient mutable flags, the whole UI state lives in one [`Session`] value and
//! changes only through [`Session::apply`].
//!
//! ## Pages
//!
//! ```text
//!            ┌──────────── GoHome (from anywhere) ─────────────┐
//!            ▼                                                 │
//!          Home ──StartNewClient──► NewClient ──ClientSaved──► SavedClient
//!            │  ──StartNewProject─► NewProject ─ProjectSaved─► SavedProject
//!            │
//!            ├──OpenClient──► ClientProfile ──Edit──► EditClient ──Updated──► ClientProfile
//!            │                    │   ▲                   │
//!            │             OpenProject│OpenClient         └─ConfirmDelete──► Home
//!            │                    ▼   │
//!            └──OpenProject─► ProjectProfile ─Edit─► EditProject ─Updated─► ProjectProfile
//!
//!   any profile/edit page ──ProfileMissing──► InvalidProfile
//! ```
//!
//! [`transition`] is the table. An event it does not list for the current
//! page is rejected with [`DossierError::InvalidTransition`] and the session
//! is left untouched.
//!
//! ## Side state
//!
//! - `menu_open`: the "register new" menu on Home. Closed by any page change.
//! - `pending_delete`: the confirmation step before a delete. Reset by any
//!   page change; `ConfirmDelete` without it is rejected.
//! - `carousel`: index into the current project's images. Reset on entering a
//!   project profile.
//! - `flash`: a one-shot success message, taken by the page that shows it.

use crate::error::{DossierError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    ClientProfile(String),
    ProjectProfile(String),
    NewClient,
    EditClient(String),
    NewProject,
    EditProject(String),
    /// Confirmation after creating a client; holds the saved display name.
    SavedClient(String),
    SavedProject(String),
    /// The selected record no longer exists.
    InvalidProfile,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Home => write!(f, "home"),
            Page::ClientProfile(id) => write!(f, "client profile {}", id),
            Page::ProjectProfile(code) => write!(f, "project profile {}", code),
            Page::NewClient => write!(f, "new client"),
            Page::EditClient(id) => write!(f, "edit client {}", id),
            Page::NewProject => write!(f, "new project"),
            Page::EditProject(code) => write!(f, "edit project {}", code),
            Page::SavedClient(_) => write!(f, "client saved"),
            Page::SavedProject(_) => write!(f, "project saved"),
            Page::InvalidProfile => write!(f, "invalid profile"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    GoHome,
    ToggleMenu,
    StartNewClient,
    StartNewProject,
    OpenClient(String),
    OpenProject(String),
    ProfileMissing,
    Edit,
    BackToProfile,
    ClientSaved { name: String },
    ProjectSaved { name: String },
    ClientUpdated { id: String },
    ProjectUpdated { code: String },
    RequestDelete,
    CancelDelete,
    ConfirmDelete,
    NextImage { count: usize },
    PrevImage { count: usize },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::GoHome => "go home",
            Event::ToggleMenu => "toggle menu",
            Event::StartNewClient => "new client",
            Event::StartNewProject => "new project",
            Event::OpenClient(_) => "open client",
            Event::OpenProject(_) => "open project",
            Event::ProfileMissing => "profile missing",
            Event::Edit => "edit",
            Event::BackToProfile => "back to profile",
            Event::ClientSaved { .. } => "client saved",
            Event::ProjectSaved { .. } => "project saved",
            Event::ClientUpdated { .. } => "client updated",
            Event::ProjectUpdated { .. } => "project updated",
            Event::RequestDelete => "request delete",
            Event::CancelDelete => "cancel delete",
            Event::ConfirmDelete => "confirm delete",
            Event::NextImage { .. } => "next image",
            Event::PrevImage { .. } => "previous image",
        };
        write!(f, "{}", name)
    }
}

/// The page an event leads to, or `None` if the event is not valid there.
/// Events that only touch side state map a page to itself.
pub fn transition(page: &Page, event: &Event) -> Option<Page> {
    use Event as E;
    use Page as P;

    match (page, event) {
        (_, E::GoHome) => Some(P::Home),

        (P::Home, E::ToggleMenu) => Some(P::Home),
        (P::Home, E::StartNewClient) => Some(P::NewClient),
        (P::Home, E::StartNewProject) => Some(P::NewProject),

        (P::Home | P::ProjectProfile(_), E::OpenClient(id)) => Some(P::ClientProfile(id.clone())),
        (P::Home | P::ClientProfile(_), E::OpenProject(code)) => {
            Some(P::ProjectProfile(code.clone()))
        }

        (
            P::ClientProfile(_) | P::ProjectProfile(_) | P::EditClient(_) | P::EditProject(_),
            E::ProfileMissing,
        ) => Some(P::InvalidProfile),

        (P::ClientProfile(id), E::Edit) => Some(P::EditClient(id.clone())),
        (P::ProjectProfile(code), E::Edit) => Some(P::EditProject(code.clone())),

        (P::EditClient(id), E::BackToProfile) => Some(P::ClientProfile(id.clone())),
        (P::EditProject(code), E::BackToProfile) => Some(P::ProjectProfile(code.clone())),

        (P::NewClient, E::ClientSaved { name }) => Some(P::SavedClient(name.clone())),
        (P::NewProject, E::ProjectSaved { name }) => Some(P::SavedProject(name.clone())),

        (P::EditClient(_), E::ClientUpdated { id }) => Some(P::ClientProfile(id.clone())),
        (P::EditProject(_), E::ProjectUpdated { code }) => Some(P::ProjectProfile(code.clone())),

        (P::EditClient(_) | P::EditProject(_), E::RequestDelete | E::CancelDelete) => {
            Some(page.clone())
        }
        (P::EditClient(_) | P::EditProject(_), E::ConfirmDelete) => Some(P::Home),

        (P::ProjectProfile(_), E::NextImage { .. } | E::PrevImage { .. }) => Some(page.clone()),

        _ => None,
    }
}

/// Wraparound index over a project's images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Carousel {
    len: usize,
    index: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    /// Restores a saved index, falling back to 0 when it no longer fits
    /// (images can disappear between two views).
    pub fn at(len: usize, index: usize) -> Self {
        let index = if index < len { index } else { 0 };
        Self { len, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.index)
    }

    /// "Image 2 of 5", or "No images" when empty.
    pub fn label(&self) -> String {
        if self.len == 0 {
            return "No images".to_string();
        }
        format!("Image {} of {}", self.index + 1, self.len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    page: Page,
    menu_open: bool,
    pending_delete: bool,
    carousel_index: usize,
    flash: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            page: Page::Home,
            menu_open: false,
            pending_delete: false,
            carousel_index: 0,
            flash: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn pending_delete(&self) -> bool {
        self.pending_delete
    }

    pub fn carousel(&self, len: usize) -> Carousel {
        Carousel::at(len, self.carousel_index)
    }

    /// Takes the pending success message, if any.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }

    pub fn apply(&mut self, event: Event) -> Result<&Page> {
        let invalid = || DossierError::InvalidTransition {
            from: self.page.to_string(),
            event: event.to_string(),
        };

        let next = transition(&self.page, &event).ok_or_else(invalid)?;
        if event == Event::ConfirmDelete && !self.pending_delete {
            return Err(invalid());
        }

        match &event {
            Event::ToggleMenu => self.menu_open = !self.menu_open,
            Event::RequestDelete => self.pending_delete = true,
            Event::CancelDelete => self.pending_delete = false,
            Event::NextImage { count } => {
                let mut carousel = self.carousel(*count);
                carousel.next();
                self.carousel_index = carousel.index();
            }
            Event::PrevImage { count } => {
                let mut carousel = self.carousel(*count);
                carousel.prev();
                self.carousel_index = carousel.index();
            }
            Event::ClientUpdated { .. } => {
                self.flash = Some("Client updated.".to_string());
            }
            Event::ProjectUpdated { .. } => {
                self.flash = Some("Project updated.".to_string());
            }
            Event::ConfirmDelete => {
                self.flash = Some("Record deleted.".to_string());
            }
            _ => {}
        }

        if next != self.page {
            if matches!(next, Page::ProjectProfile(_)) {
                self.carousel_index = 0;
            }
            self.menu_open = false;
            self.pending_delete = false;
            tracing::debug!(from = %self.page, to = %next, "navigated");
            self.page = next;
        }

        Ok(&self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carousel_wraps_both_ways() {
        let mut c = Carousel::new(3);
        c.next();
        c.next();
        assert_eq!(c.index(), 2);
        c.next();
        assert_eq!(c.index(), 0);
        c.prev();
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn carousel_single_and_empty_stay_put() {
        let mut one = Carousel::new(1);
        one.next();
        one.prev();
        assert_eq!(one.index(), 0);

        let mut none = Carousel::new(0);
        none.next();
        none.prev();
        assert_eq!(none.index(), 0);
        assert_eq!(none.current::<u8>(&[]), None);
    }

    #[test]
    fn carousel_clamps_stale_index() {
        assert_eq!(Carousel::at(2, 5).index(), 0);
        assert_eq!(Carousel::at(4, 3).index(), 3);
        assert_eq!(Carousel::at(4, 3).label(), "Image 4 of 4");
    }

    #[test]
    fn empty_carousel_label_says_so() {
        assert_eq!(Carousel::new(0).label(), "No images");
        assert_eq!(Carousel::at(0, 2).label(), "No images");
    }

    #[test]
    fn create_client_flow() {
        let mut s = Session::new();
        s.apply(Event::ToggleMenu).unwrap();
        assert!(s.menu_open());
        s.apply(Event::StartNewClient).unwrap();
        assert!(!s.menu_open());
        s.apply(Event::ClientSaved {
            name: "Ana Lopez".into(),
        })
        .unwrap();
        assert_eq!(s.page(), &Page::SavedClient("Ana Lopez".into()));
        s.apply(Event::GoHome).unwrap();
        assert_eq!(s.page(), &Page::Home);
    }

    #[test]
    fn edit_with_rename_lands_on_new_profile_with_flash() {
        let mut s = Session::new();
        s.apply(Event::OpenClient("A".into())).unwrap();
        s.apply(Event::Edit).unwrap();
        assert_eq!(s.page(), &Page::EditClient("A".into()));
        s.apply(Event::ClientUpdated { id: "B".into() }).unwrap();
        assert_eq!(s.page(), &Page::ClientProfile("B".into()));
        assert_eq!(s.take_flash().as_deref(), Some("Client updated."));
        assert_eq!(s.take_flash(), None);
    }

    #[test]
    fn confirm_delete_requires_request() {
        let mut s = Session::new();
        s.apply(Event::OpenProject("OP-1".into())).unwrap();
        s.apply(Event::Edit).unwrap();
        assert!(s.apply(Event::ConfirmDelete).is_err());

        s.apply(Event::RequestDelete).unwrap();
        assert!(s.pending_delete());
        s.apply(Event::CancelDelete).unwrap();
        assert!(!s.pending_delete());

        s.apply(Event::RequestDelete).unwrap();
        s.apply(Event::ConfirmDelete).unwrap();
        assert_eq!(s.page(), &Page::Home);
        assert!(!s.pending_delete());
    }

    #[test]
    fn leaving_edit_page_drops_pending_delete() {
        let mut s = Session::new();
        s.apply(Event::OpenClient("A".into())).unwrap();
        s.apply(Event::Edit).unwrap();
        s.apply(Event::RequestDelete).unwrap();
        s.apply(Event::BackToProfile).unwrap();
        assert!(!s.pending_delete());
    }

    #[test]
    fn invalid_event_leaves_session_untouched() {
        let mut s = Session::new();
        let before = s.clone();
        let err = s.apply(Event::Edit).unwrap_err();
        assert!(matches!(err, DossierError::InvalidTransition { .. }));
        assert_eq!(s, before);
    }

    #[test]
    fn missing_profile_goes_to_invalid_page_and_back_home() {
        let mut s = Session::new();
        s.apply(Event::OpenClient("gone".into())).unwrap();
        s.apply(Event::ProfileMissing).unwrap();
        assert_eq!(s.page(), &Page::InvalidProfile);
        s.apply(Event::GoHome).unwrap();
        assert_eq!(s.page(), &Page::Home);
    }

    #[test]
    fn carousel_index_resets_when_entering_project() {
        let mut s = Session::new();
        s.apply(Event::OpenProject("OP-1".into())).unwrap();
        s.apply(Event::NextImage { count: 3 }).unwrap();
        s.apply(Event::NextImage { count: 3 }).unwrap();
        assert_eq!(s.carousel(3).index(), 2);
        s.apply(Event::PrevImage { count: 3 }).unwrap();
        assert_eq!(s.carousel(3).index(), 1);

        s.apply(Event::GoHome).unwrap();
        s.apply(Event::OpenProject("OP-2".into())).unwrap();
        assert_eq!(s.carousel(3).index(), 0);
    }

    #[test]
    fn client_and_project_profiles_link_to_each_other() {
        let mut s = Session::new();
        s.apply(Event::OpenClient("A".into())).unwrap();
        s.apply(Event::OpenProject("OP-1".into())).unwrap();
        s.apply(Event::OpenClient("A".into())).unwrap();
        assert_eq!(s.page(), &Page::ClientProfile("A".into()));
    }
}
