use super::User;

/// What the widget can currently display. Exactly one case is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No data and no error yet
    #[default]
    Loading,
    /// A user is available for display
    Ready(User),
    /// The last fetch failed; carries a user-presentable message
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            LoadState::Ready(user) => Some(user),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
