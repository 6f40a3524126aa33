use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::notification::NotificationKind;

/// Lifecycle of one user's response to a report request.
///
/// `Pending` is the implicit starting point, before any submission record
/// exists. Submission produces `Submitted`; review moves it to `Returned` or
/// `Approved`. `Approved` is terminal in the client, though nothing in the
/// data model forbids further writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Submitted,
    Returned,
    Approved,
}

/// Declared on the request but not enforced anywhere downstream; kept
/// because the client records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Any,
    Excel,
    Text,
}

/// An admin/manager-issued ask for one or more users to hand in a report.
/// Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub created_by: String,
    pub assigned_user_ids: Vec<String>,
    pub required_format: ReportFormat,
    pub created_at: DateTime<Utc>,
}

/// One user's response to a request: free text, an optional grid and a list
/// of simulated file names. At most one record per (request, user) pair;
/// a resubmission replaces the old record in place with a fresh id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub id: String,
    pub request_id: String,
    pub user_id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub content: Option<String>,
    pub table_data: Option<Grid>,
    pub files: Option<Vec<String>>,
    pub feedback: Option<String>,
}

/// A named, reusable set of user ids for bulk assignment. Convenience only:
/// nothing maintains the member list if users go away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: String,
    pub name: String,
    pub user_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateReportRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_user_ids: Vec<String>,
    pub required_format: Option<ReportFormat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitReportRequest {
    pub request_id: String,
    pub content: Option<String>,
    pub table_data: Option<Grid>,
    pub files: Option<Vec<String>>,
}

impl AppState {
    /// Issues a report request and fans out one alert per assigned user.
    /// Admin/manager only.
    pub fn create_report_request(&mut self, payload: CreateReportRequest) -> Result<&ReportRequest> {
        let creator = self.require_user()?;
        if !creator.role.can_review_reports() {
            return Err(Error::Forbidden);
        }
        let created_by = creator.id.clone();
        if payload.title.trim().is_empty() {
            return Err(Error::EmptyField("title"));
        }
        // Assignment targets come from the user picker; check them up front
        // so the fan-out below cannot fail halfway.
        for user_id in &payload.assigned_user_ids {
            if !self.users.iter().any(|u| &u.id == user_id) {
                return Err(Error::UserNotFound(user_id.clone()));
            }
        }

        let request = ReportRequest {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            description: payload.description.unwrap_or_default(),
            due_date: payload.due_date,
            created_by,
            assigned_user_ids: payload.assigned_user_ids,
            required_format: payload.required_format.unwrap_or(ReportFormat::Any),
            created_at: Utc::now(),
        };
        info!(
            "report request created: {} for {} user(s)",
            request.title,
            request.assigned_user_ids.len()
        );

        let title = request.title.clone();
        let assigned = request.assigned_user_ids.clone();
        self.report_requests.push(request);

        for user_id in &assigned {
            self.notify(
                user_id,
                "Report requested",
                format!("A report is due: {title}"),
                NotificationKind::Alert,
                None,
            )?;
        }

        let idx = self.report_requests.len() - 1;
        Ok(&self.report_requests[idx])
    }

    /// Submits (or resubmits) the session user's report for a request.
    ///
    /// A prior record for the same (request, user) pair is replaced at its
    /// list index: new id, no history, feedback wiped. The notification
    /// goes to the first user found with the admin role, not necessarily
    /// the request's creator; the client has always worked that way and
    /// the behavior is kept. No admin registered means no notification.
    pub fn submit_report(&mut self, payload: SubmitReportRequest) -> Result<&ReportSubmission> {
        let submitter = self.require_user()?;
        let user_id = submitter.id.clone();
        let user_name = submitter.name.clone();

        let request = self
            .report_requests
            .iter()
            .find(|r| r.id == payload.request_id)
            .ok_or_else(|| Error::RequestNotFound(payload.request_id.clone()))?;
        if !request.assigned_user_ids.contains(&user_id) {
            return Err(Error::NotAssigned);
        }

        let submission = ReportSubmission {
            id: Uuid::new_v4().to_string(),
            request_id: payload.request_id,
            user_id: user_id.clone(),
            submitted_at: Utc::now(),
            status: ReportStatus::Submitted,
            content: payload.content,
            table_data: payload.table_data,
            files: payload.files,
            feedback: None,
        };
        info!("report submitted by {} for {}", user_name, submission.request_id);

        let idx = match self
            .report_submissions
            .iter()
            .position(|s| s.request_id == submission.request_id && s.user_id == user_id)
        {
            Some(existing) => {
                self.report_submissions[existing] = submission;
                existing
            }
            None => {
                self.report_submissions.push(submission);
                self.report_submissions.len() - 1
            }
        };

        let first_admin = self
            .users
            .iter()
            .find(|u| u.role == crate::auth::Role::Admin)
            .map(|u| u.id.clone());
        if let Some(admin_id) = first_admin {
            self.notify(
                &admin_id,
                "Report submitted",
                format!("{user_name} submitted a report."),
                NotificationKind::Assignment,
                None,
            )?;
        }

        Ok(&self.report_submissions[idx])
    }

    /// Review decision: sets the status and the feedback text, nothing
    /// else. Content, grid and files stay as submitted. The submitter is
    /// not notified, a known gap, kept as-is.
    pub fn review_submission(
        &mut self,
        submission_id: &str,
        status: ReportStatus,
        feedback: Option<String>,
    ) -> Result<()> {
        let reviewer = self.require_user()?;
        if !reviewer.role.can_review_reports() {
            return Err(Error::Forbidden);
        }

        let submission = self
            .report_submissions
            .iter_mut()
            .find(|s| s.id == submission_id)
            .ok_or_else(|| Error::SubmissionNotFound(submission_id.to_string()))?;
        info!("submission {} reviewed: {:?}", submission.id, status);
        submission.status = status;
        submission.feedback = feedback;
        Ok(())
    }

    /// A group needs a name and at least one member.
    pub fn create_group(&mut self, name: &str, user_ids: Vec<String>) -> Result<&UserGroup> {
        if name.trim().is_empty() {
            return Err(Error::EmptyField("name"));
        }
        if user_ids.is_empty() {
            return Err(Error::EmptyField("members"));
        }
        let group = UserGroup {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            user_ids,
        };
        self.user_groups.push(group);
        let idx = self.user_groups.len() - 1;
        Ok(&self.user_groups[idx])
    }

    pub fn delete_group(&mut self, group_id: &str) -> Result<()> {
        let before = self.user_groups.len();
        self.user_groups.retain(|g| g.id != group_id);
        if self.user_groups.len() == before {
            return Err(Error::GroupNotFound(group_id.to_string()));
        }
        Ok(())
    }

    /// Unions a group's members into an assignment list, duplicate-safe,
    /// preserving first-seen order.
    pub fn expand_group(&self, assigned: &[String], group_id: &str) -> Result<Vec<String>> {
        let group = self
            .user_groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| Error::GroupNotFound(group_id.to_string()))?;

        let mut merged = assigned.to_vec();
        for user_id in &group.user_ids {
            if !merged.contains(user_id) {
                merged.push(user_id.clone());
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::grid::Grid;

    fn logged_in(role: Role) -> AppState {
        let mut state = AppState::seeded();
        let id = state
            .users
            .iter()
            .find(|u| u.role == role)
            .map(|u| u.id.clone())
            .unwrap();
        state.login(&id, "123").unwrap();
        state
    }

    fn user_id(state: &AppState, role: Role) -> String {
        state
            .users
            .iter()
            .find(|u| u.role == role)
            .map(|u| u.id.clone())
            .unwrap()
    }

    fn weekly_report(state: &mut AppState, assigned: Vec<String>) -> String {
        state
            .create_report_request(CreateReportRequest {
                title: "Weekly Report".to_string(),
                assigned_user_ids: assigned,
                ..Default::default()
            })
            .unwrap()
            .id
            .clone()
    }

    fn submit(state: &mut AppState, request_id: &str, content: &str) -> String {
        state
            .submit_report(SubmitReportRequest {
                request_id: request_id.to_string(),
                content: Some(content.to_string()),
                ..Default::default()
            })
            .unwrap()
            .id
            .clone()
    }

    #[test]
    fn request_fans_out_one_alert_per_assignee() {
        let mut state = logged_in(Role::Admin);
        let manager = user_id(&state, Role::Manager);
        let employee = user_id(&state, Role::Employee);
        let before = state.notifications.len();

        weekly_report(&mut state, vec![manager.clone(), employee.clone()]);

        assert_eq!(state.notifications.len(), before + 2);
        let new: Vec<_> = state.notifications.iter().take(2).collect();
        assert!(new.iter().any(|n| n.to_user_id == manager));
        assert!(new.iter().any(|n| n.to_user_id == employee));
        for note in new {
            assert_eq!(note.kind, NotificationKind::Alert);
            assert!(note.description.contains("Weekly Report"));
        }
    }

    #[test]
    fn employees_cannot_issue_requests() {
        let mut state = logged_in(Role::Employee);
        let err = state
            .create_report_request(CreateReportRequest {
                title: "Sneaky".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, Error::Forbidden);
    }

    #[test]
    fn request_rejects_unknown_assignees() {
        let mut state = logged_in(Role::Manager);
        let err = state
            .create_report_request(CreateReportRequest {
                title: "Weekly Report".to_string(),
                assigned_user_ids: vec!["ghost".to_string()],
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, Error::UserNotFound("ghost".to_string()));
        assert!(state.report_requests.is_empty());
    }

    #[test]
    fn submission_notifies_the_first_admin_found() {
        // The manager creates the request, yet the notification lands on
        // the first admin in the user list.
        let mut state = logged_in(Role::Manager);
        let employee = user_id(&state, Role::Employee);
        let admin = user_id(&state, Role::Admin);
        let request = weekly_report(&mut state, vec![employee.clone()]);

        state.login(&employee, "123").unwrap();
        submit(&mut state, &request, "All done");

        let note = &state.notifications[0];
        assert_eq!(note.to_user_id, admin);
        assert_eq!(note.kind, NotificationKind::Assignment);
        assert!(note.description.contains("Alexey Smirnov"));
    }

    #[test]
    fn submission_without_an_admin_stays_silent() {
        let mut state = AppState::new();
        state.register("Lead", Role::Manager, "pw").unwrap();
        let lead = state.current_user().unwrap().id.clone();
        state.register("Worker", Role::Employee, "pw").unwrap();
        let worker = state.current_user().unwrap().id.clone();

        state.login(&lead, "pw").unwrap();
        let request = weekly_report(&mut state, vec![worker.clone()]);
        state.login(&worker, "pw").unwrap();
        let before = state.notifications.len();

        submit(&mut state, &request, "done");
        assert_eq!(state.notifications.len(), before);
    }

    #[test]
    fn resubmission_replaces_in_place() {
        let mut state = logged_in(Role::Admin);
        let employee = user_id(&state, Role::Employee);
        let request = weekly_report(&mut state, vec![employee.clone()]);

        state.login(&employee, "123").unwrap();
        let first_id = submit(&mut state, &request, "first draft");

        state.login(&user_id(&state, Role::Admin), "123").unwrap();
        state
            .review_submission(&first_id, ReportStatus::Returned, Some("redo".to_string()))
            .unwrap();

        state.login(&employee, "123").unwrap();
        let second_id = submit(&mut state, &request, "second draft");

        assert_eq!(state.report_submissions.len(), 1);
        let sub = &state.report_submissions[0];
        assert_eq!(sub.id, second_id);
        assert_ne!(first_id, second_id);
        assert_eq!(sub.content.as_deref(), Some("second draft"));
        assert_eq!(sub.status, ReportStatus::Submitted);
        // The fresh record carries no stale feedback.
        assert!(sub.feedback.is_none());
    }

    #[test]
    fn submitting_when_not_assigned_is_rejected() {
        let mut state = logged_in(Role::Admin);
        let manager = user_id(&state, Role::Manager);
        let request = weekly_report(&mut state, vec![manager]);

        let employee = user_id(&state, Role::Employee);
        state.login(&employee, "123").unwrap();
        let err = state
            .submit_report(SubmitReportRequest {
                request_id: request,
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, Error::NotAssigned);
    }

    #[test]
    fn review_touches_status_and_feedback_only() {
        let mut state = logged_in(Role::Admin);
        let employee = user_id(&state, Role::Employee);
        let request = weekly_report(&mut state, vec![employee.clone()]);

        state.login(&employee, "123").unwrap();
        let mut grid = Grid::new(2, 2);
        grid.set_value(0, 0, "Q4").unwrap();
        let sub_id = state
            .submit_report(SubmitReportRequest {
                request_id: request,
                content: Some("numbers attached".to_string()),
                table_data: Some(grid.clone()),
                files: Some(vec!["report.pdf".to_string()]),
            })
            .unwrap()
            .id
            .clone();

        state.login(&user_id(&state, Role::Admin), "123").unwrap();
        state
            .review_submission(&sub_id, ReportStatus::Approved, Some("Well done".to_string()))
            .unwrap();

        let sub = &state.report_submissions[0];
        assert_eq!(sub.status, ReportStatus::Approved);
        assert_eq!(sub.feedback.as_deref(), Some("Well done"));
        assert_eq!(sub.content.as_deref(), Some("numbers attached"));
        assert_eq!(sub.table_data.as_ref(), Some(&grid));
        assert_eq!(sub.files.as_deref(), Some(&["report.pdf".to_string()][..]));
        assert_eq!(sub.id, sub_id);
    }

    #[test]
    fn review_overwrites_feedback_every_time() {
        let mut state = logged_in(Role::Admin);
        let employee = user_id(&state, Role::Employee);
        let request = weekly_report(&mut state, vec![employee.clone()]);
        state.login(&employee, "123").unwrap();
        let sub_id = submit(&mut state, &request, "draft");

        state.login(&user_id(&state, Role::Admin), "123").unwrap();
        state
            .review_submission(&sub_id, ReportStatus::Returned, Some("fix totals".to_string()))
            .unwrap();
        // A later decision with no feedback clears the previous text.
        state
            .review_submission(&sub_id, ReportStatus::Approved, None)
            .unwrap();

        let sub = &state.report_submissions[0];
        assert_eq!(sub.status, ReportStatus::Approved);
        assert!(sub.feedback.is_none());
    }

    #[test]
    fn review_is_role_gated() {
        let mut state = logged_in(Role::Admin);
        let employee = user_id(&state, Role::Employee);
        let request = weekly_report(&mut state, vec![employee.clone()]);
        state.login(&employee, "123").unwrap();
        let sub_id = submit(&mut state, &request, "draft");

        let err = state
            .review_submission(&sub_id, ReportStatus::Approved, None)
            .unwrap_err();
        assert_eq!(err, Error::Forbidden);
    }

    #[test]
    fn groups_expand_into_assignments_without_duplicates() {
        let mut state = logged_in(Role::Admin);
        let manager = user_id(&state, Role::Manager);
        let employee = user_id(&state, Role::Employee);

        let group_id = state
            .create_group("Backoffice", vec![manager.clone(), employee.clone()])
            .unwrap()
            .id
            .clone();

        let assigned = vec![manager.clone()];
        let merged = state.expand_group(&assigned, &group_id).unwrap();
        assert_eq!(merged, vec![manager.clone(), employee.clone()]);

        // Expanding again changes nothing.
        let again = state.expand_group(&merged, &group_id).unwrap();
        assert_eq!(again, merged);
    }

    #[test]
    fn group_lifecycle() {
        let mut state = logged_in(Role::Admin);
        assert_eq!(
            state.create_group(" ", vec!["x".to_string()]).unwrap_err(),
            Error::EmptyField("name")
        );
        assert_eq!(
            state.create_group("Empty", Vec::new()).unwrap_err(),
            Error::EmptyField("members")
        );

        let id = state
            .create_group("Backoffice", vec!["x".to_string()])
            .unwrap()
            .id
            .clone();
        state.delete_group(&id).unwrap();
        assert_eq!(
            state.delete_group(&id).unwrap_err(),
            Error::GroupNotFound(id.clone())
        );
    }
}
