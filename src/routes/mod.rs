//! Client route table.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation target resolves to a [`Route`], and every route belongs
//! to exactly one [`guard::Destination`] class. The guard only ever sees the
//! class.

pub mod guard;


use guard::Destination;

/// A navigable client location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Onboarding,
    /// Default authenticated destination.
    Home,
    Discover,
    Shelves,
    /// Detail page for one book.
    Book(String),
    Profile,
}

impl Route {
    /// Parse a path such as `/book/42?tab=reviews`. Returns `None` for
    /// paths with no matching route.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Self::Home),
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["onboarding"] => Some(Self::Onboarding),
            ["discover"] => Some(Self::Discover),
            ["shelves"] => Some(Self::Shelves),
            ["profile"] => Some(Self::Profile),
            ["book", id] => Some(Self::Book((*id).to_owned())),
            _ => None,
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Onboarding => "/onboarding".to_owned(),
            Self::Home => "/".to_owned(),
            Self::Discover => "/discover".to_owned(),
            Self::Shelves => "/shelves".to_owned(),
            Self::Book(id) => format!("/book/{id}"),
            Self::Profile => "/profile".to_owned(),
        }
    }

    #[must_use]
    pub const fn destination(&self) -> Destination {
        match self {
            Self::Login | Self::Register => Destination::Public,
            Self::Onboarding => Destination::Onboarding,
            Self::Home | Self::Discover | Self::Shelves | Self::Book(_) | Self::Profile => Destination::Protected,
        }
    }
}
