use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Role, User};
use crate::notification::{Notification, NotificationKind};
use crate::project::Project;
use crate::report::{ReportRequest, ReportSubmission, UserGroup};
use crate::task::{Comment, Task, TaskPriority, TaskStatus};

/// Which screen the client is showing. Not pure presentation: task creation
/// tags the new task personal or team and binds it to the active project
/// depending on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppView {
    Home,
    MyTasks,
    Inbox,
    Reports,
    Project,
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Board,
    List,
}

/// The whole application state, owned by one caller.
///
/// All stores live here and every mutation goes through a method on this
/// struct. There is a single logical writer, so mutations are plain
/// last-write-wins with no locking. Cross-store side effects (a task plus
/// its assignment notification, a request plus its fan-out) are sequential
/// non-atomic writes by the same method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    pub users: Vec<User>,
    pub user_groups: Vec<UserGroup>,
    /// Id of the session user. Plain in-memory session, no tokens.
    pub current_user_id: Option<String>,

    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    /// Most-recent-first; fan-out points prepend.
    pub notifications: Vec<Notification>,

    pub report_requests: Vec<ReportRequest>,
    pub report_submissions: Vec<ReportSubmission>,

    pub current_view: AppView,
    pub current_project_id: Option<String>,
    pub view_mode: ViewMode,
    pub filter_priority: Option<TaskPriority>,
}

impl AppState {
    /// An empty workspace: no users, nothing seeded, nobody logged in.
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            user_groups: Vec::new(),
            current_user_id: None,
            tasks: Vec::new(),
            projects: Vec::new(),
            notifications: Vec::new(),
            report_requests: Vec::new(),
            report_submissions: Vec::new(),
            current_view: AppView::Home,
            current_project_id: None,
            view_mode: ViewMode::Board,
            filter_priority: None,
        }
    }

    /// The demo workspace the client boots with: three users covering the
    /// three roles, three projects, three tasks (one with a comment) and a
    /// welcome notification for the admin. State is transient, so this is
    /// what "reset on reload" returns to.
    pub fn seeded() -> Self {
        let mut state = Self::new();

        let admin = User::new("Ivan Ivanov", Role::Admin, "123", "indigo");
        let manager = User::new("Elena Petrova", Role::Manager, "123", "pink");
        let employee = User::new("Alexey Smirnov", Role::Employee, "123", "blue");

        let website = Project::new("Website redesign", "blue");
        let mobile = Project::new("Mobile app", "purple");
        let marketing = Project::new("Q4 marketing", "green");

        state.tasks = vec![
            Task {
                id: Uuid::new_v4().to_string(),
                project_id: Some(website.id.clone()),
                title: "Design the new landing page".to_string(),
                description: "Bring the UX/UI in line with the new brand book.".to_string(),
                status: TaskStatus::InProgress,
                priority: TaskPriority::High,
                due_date: NaiveDate::from_ymd_opt(2023, 11, 15),
                assignee: employee.name.clone(),
                comments: Vec::new(),
                is_personal: false,
                created_at: Utc::now(),
            },
            Task {
                id: Uuid::new_v4().to_string(),
                project_id: Some(website.id.clone()),
                title: "Integrate the payments API".to_string(),
                description: "Wire up Stripe and PayPal.".to_string(),
                status: TaskStatus::Todo,
                priority: TaskPriority::High,
                due_date: NaiveDate::from_ymd_opt(2023, 11, 20),
                assignee: admin.name.clone(),
                comments: vec![Comment {
                    id: Uuid::new_v4().to_string(),
                    text: "Are the Stripe API keys in the secrets already?".to_string(),
                    author_name: manager.name.clone(),
                    author_role: manager.role,
                    created_at: Utc::now(),
                    avatar_color: manager.avatar_color.clone(),
                }],
                is_personal: false,
                created_at: Utc::now(),
            },
            Task {
                id: Uuid::new_v4().to_string(),
                project_id: Some(mobile.id.clone()),
                title: "Write the documentation".to_string(),
                description: "Refresh the README and the project wiki.".to_string(),
                status: TaskStatus::Done,
                priority: TaskPriority::Low,
                due_date: NaiveDate::from_ymd_opt(2023, 11, 1),
                assignee: manager.name.clone(),
                comments: Vec::new(),
                is_personal: false,
                created_at: Utc::now(),
            },
        ];

        state.notifications = vec![Notification {
            id: Uuid::new_v4().to_string(),
            title: "Welcome".to_string(),
            description: "Welcome to taskdesk!".to_string(),
            created_at: Utc::now(),
            read: false,
            kind: NotificationKind::Alert,
            to_user_id: admin.id.clone(),
            from_user_name: None,
        }];

        state.current_project_id = Some(website.id.clone());
        state.users = vec![admin, manager, employee];
        state.projects = vec![website, mobile, marketing];
        state
    }

    /// Switch the active screen, optionally focusing a project.
    pub fn navigate(&mut self, view: AppView, project_id: Option<&str>) {
        self.current_view = view;
        if let Some(id) = project_id {
            self.current_project_id = Some(id.to_string());
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn set_filter_priority(&mut self, priority: Option<TaskPriority>) {
        self.filter_priority = priority;
    }

    /// The project the board is focused on, falling back to the first one.
    pub fn active_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_ref()
            .and_then(|id| self.projects.iter().find(|p| &p.id == id))
            .or_else(|| self.projects.first())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
