use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::{AppState, AppView};
use crate::error::{Error, Result};

/// A project is little more than a named, colored bucket for tasks. It is
/// never mutated or deleted after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: color.to_string(),
            created_at: Utc::now(),
        }
    }
}

impl AppState {
    /// Creates a project and navigates straight to it, as the client does
    /// after the new-project modal closes.
    pub fn create_project(&mut self, name: &str, color: &str) -> Result<&Project> {
        if name.trim().is_empty() {
            return Err(Error::EmptyField("name"));
        }

        let project = Project::new(name, color);
        info!("project created: {} ({})", project.name, project.id);
        self.current_view = AppView::Project;
        self.current_project_id = Some(project.id.clone());
        self.projects.push(project);
        let idx = self.projects.len() - 1;
        Ok(&self.projects[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_project_navigates_to_it() {
        let mut state = AppState::seeded();
        let id = state.create_project("Internal tools", "teal").unwrap().id.clone();

        assert_eq!(state.projects.len(), 4);
        assert_eq!(state.current_view, AppView::Project);
        assert_eq!(state.current_project_id.as_deref(), Some(id.as_str()));
        assert_eq!(state.active_project().unwrap().name, "Internal tools");
    }

    #[test]
    fn create_project_rejects_empty_name() {
        let mut state = AppState::new();
        let err = state.create_project("   ", "red").unwrap_err();
        assert_eq!(err, Error::EmptyField("name"));
    }
}
