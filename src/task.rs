use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::{AppState, AppView};
use crate::error::{Error, Result};
use crate::notification::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Immutable once appended; owned by exactly one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author_name: String,
    pub author_role: crate::auth::Role,
    pub created_at: DateTime<Utc>,
    pub avatar_color: String,
}

/// Display name used when a team task has nobody on it.
pub const UNASSIGNED: &str = "Unassigned";

/// A unit of work on a board.
///
/// `assignee` is a display name, not a user id: renaming a user silently
/// breaks the link. Tasks are never deleted; the only mutations are the
/// status move and the comment append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Absent for personal tasks.
    pub project_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub assignee: String,
    pub comments: Vec<Comment>,
    pub is_personal: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation payload; omitted fields fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<String>,
}

impl AppState {
    /// Creates a task in the scope of the active view.
    ///
    /// Personal view produces a personal task assigned to the acting user;
    /// the project view binds the task to the active project. A team task
    /// assigned to somebody else fans out exactly one assignment
    /// notification, unless the assignee name matches no user, in which
    /// case the notification is silently skipped.
    pub fn add_task(&mut self, payload: CreateTaskRequest) -> Result<&Task> {
        let acting = self.require_user()?;
        let acting_name = acting.name.clone();
        if payload.title.trim().is_empty() {
            return Err(Error::EmptyField("title"));
        }

        let is_personal = self.current_view == AppView::Personal;
        let project_id = if self.current_view == AppView::Project {
            self.current_project_id.clone()
        } else {
            None
        };
        let assignee = if is_personal {
            acting_name.clone()
        } else {
            payload
                .assignee
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| UNASSIGNED.to_string())
        };

        let task = Task {
            id: Uuid::new_v4().to_string(),
            project_id,
            title: payload.title,
            description: payload.description.unwrap_or_default(),
            status: payload.status.unwrap_or(TaskStatus::Todo),
            priority: payload.priority.unwrap_or(TaskPriority::Medium),
            due_date: payload.due_date,
            assignee,
            comments: Vec::new(),
            is_personal,
            created_at: Utc::now(),
        };
        info!("task created: {} ({})", task.title, task.id);

        let notify_target = if !is_personal
            && task.assignee != UNASSIGNED
            && task.assignee != acting_name
        {
            self.users
                .iter()
                .find(|u| u.name == task.assignee)
                .map(|u| u.id.clone())
        } else {
            None
        };

        let title = task.title.clone();
        self.tasks.push(task);

        if let Some(user_id) = notify_target {
            self.notify(
                &user_id,
                "New task",
                format!("You have been assigned a task: {title}"),
                NotificationKind::Assignment,
                None,
            )?;
        }

        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    /// Sets the status unconditionally. There is no transition table: any
    /// status may follow any other, and a same-status move is a no-op
    /// write. No side effects.
    pub fn move_task(&mut self, task_id: &str, new_status: TaskStatus) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        debug!("task {} moved to {:?}", task.id, new_status);
        task.status = new_status;
        Ok(())
    }

    /// Appends an immutable comment authored by the session user.
    pub fn add_comment(&mut self, task_id: &str, text: &str) -> Result<()> {
        let author = self.require_user()?;
        if text.trim().is_empty() {
            return Err(Error::EmptyField("comment"));
        }
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            author_name: author.name.clone(),
            author_role: author.role,
            created_at: Utc::now(),
            avatar_color: author.avatar_color.clone(),
        };

        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        task.comments.push(comment);
        Ok(())
    }

    /// The view-scoped task projection: personal tasks only on the personal
    /// screen, the session user's team tasks on "my tasks", the active
    /// project's tasks on the project screen, all team tasks elsewhere,
    /// and the priority filter on top.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let Some(user) = self.current_user() else {
            return Vec::new();
        };

        self.tasks
            .iter()
            .filter(|t| match self.current_view {
                AppView::Personal => t.is_personal && t.assignee == user.name,
                AppView::MyTasks => !t.is_personal && t.assignee == user.name,
                AppView::Project => {
                    !t.is_personal && t.project_id == self.current_project_id
                }
                _ => !t.is_personal,
            })
            .filter(|t| {
                self.filter_priority
                    .map_or(true, |p| t.priority == p)
            })
            .collect()
    }
}
