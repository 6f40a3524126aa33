use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::{AppState, AppView};
use crate::error::{Error, Result};
use crate::notification::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// Admins and managers issue report requests and review submissions.
    pub fn can_review_reports(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

/// A registered user. Passwords are stored and compared as plaintext; the
/// login check is a plain equality and nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub password: String,
    pub email: Option<String>,
    pub position: Option<String>,
    pub avatar_color: String,
}

impl User {
    pub fn new(name: &str, role: Role, password: &str, avatar_color: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            role,
            password: password.to_string(),
            email: None,
            position: None,
            avatar_color: avatar_color.to_string(),
        }
    }
}

/// Colors handed out to newly registered users, round-robin.
pub const AVATAR_PALETTE: [&str; 5] = ["red", "yellow", "green", "blue", "purple"];

/// Profile edit payload; only the present fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub password: Option<String>,
}

impl AppState {
    /// Plain password equality. On success the user becomes the session
    /// user and the client lands on the home screen.
    pub fn login(&mut self, user_id: &str, password: &str) -> Result<&User> {
        let idx = self
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        if self.users[idx].password != password {
            return Err(Error::IncorrectPassword);
        }

        self.current_user_id = Some(self.users[idx].id.clone());
        self.current_view = AppView::Home;
        info!("user logged in: {}", self.users[idx].name);
        Ok(&self.users[idx])
    }

    /// Registration mints the user, greets them with a welcome notification
    /// and opens a session for them right away.
    pub fn register(&mut self, name: &str, role: Role, password: &str) -> Result<&User> {
        if name.trim().is_empty() {
            return Err(Error::EmptyField("name"));
        }
        if password.is_empty() {
            return Err(Error::EmptyField("password"));
        }

        let color = AVATAR_PALETTE[self.users.len() % AVATAR_PALETTE.len()];
        let user = User::new(name, role, password, color);
        let user_id = user.id.clone();
        info!("user registered: {} ({:?})", user.name, user.role);
        self.users.push(user);

        self.notify(
            &user_id,
            "Welcome",
            "Thanks for signing up!".to_string(),
            NotificationKind::Alert,
            None,
        )?;

        self.current_user_id = Some(user_id);
        self.current_view = AppView::Home;
        let idx = self.users.len() - 1;
        Ok(&self.users[idx])
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current_user() {
            info!("user logged out: {}", user.name);
        }
        self.current_user_id = None;
    }

    /// Applies the present fields to the session user, in place.
    ///
    /// Tasks reference assignees by display name, so renaming a user
    /// silently orphans their task links. Known weakness, kept.
    pub fn update_profile(&mut self, update: UpdateProfileRequest) -> Result<()> {
        let current_id = self
            .current_user_id
            .clone()
            .ok_or(Error::NotLoggedIn)?;
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == current_id)
            .ok_or(Error::UserNotFound(current_id))?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = Some(email);
        }
        if let Some(position) = update.position {
            user.position = Some(position);
        }
        if let Some(password) = update.password {
            user.password = password;
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        let id = self.current_user_id.as_ref()?;
        self.users.iter().find(|u| &u.id == id)
    }

    pub(crate) fn require_user(&self) -> Result<&User> {
        self.current_user().ok_or(Error::NotLoggedIn)
    }
}
