use serde::{Deserialize, Serialize};

/// A user profile.
///
/// Fields are private so a value can't be edited after construction; a new
/// fetch always produces a new `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    title: String,
    first_name: String,
    last_name: String,
    email: String,
}

impl User {
    pub fn new(
        title: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// "Title First Last", skipping empty parts.
    pub fn full_name(&self) -> String {
        [&self.title, &self.first_name, &self.last_name]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// API Response wrappers
#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserResponse {
    #[serde(default)]
    pub results: Vec<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub name: ApiName,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiName {
    #[serde(default)]
    pub title: String,
    pub first: String,
    pub last: String,
}

impl From<ApiUser> for User {
    fn from(api: ApiUser) -> Self {
        User::new(api.name.title, api.name.first, api.name.last, api.email)
    }
}

impl RandomUserResponse {
    /// The API returns one arbitrary user per call; take the first record.
    pub fn into_first_user(self) -> Option<User> {
        self.results.into_iter().next().map(User::from)
    }
}
