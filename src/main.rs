// src/main.rs
//
// Runnable walkthrough of the engine: seeds the demo workspace and drives
// one end-to-end scenario through the stores, logging along the way.

use env_logger::Env;
use log::info;

use taskdesk::ai::DescriptionGenerator;
use taskdesk::auth::Role;
use taskdesk::config::Config;
use taskdesk::report::{CreateReportRequest, ReportStatus, SubmitReportRequest};
use taskdesk::task::CreateTaskRequest;
use taskdesk::grid::Grid;
use taskdesk::{AppState, AppView};

#[tokio::main]
async fn main() -> taskdesk::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let generator = DescriptionGenerator::from_config(&config);

    let mut state = AppState::seeded();
    let admin_id = find_id(&state, Role::Admin);
    let employee_id = find_id(&state, Role::Employee);
    let employee_name = state
        .users
        .iter()
        .find(|u| u.id == employee_id)
        .map(|u| u.name.clone())
        .expect("seed fixtures include an employee");

    // The admin assigns a task on the first project's board.
    state.login(&admin_id, "123")?;
    let website = state.projects[0].id.clone();
    state.navigate(AppView::Project, Some(website.as_str()));

    let description = generator.generate("Prepare the quarterly review").await;
    let task_id = state
        .add_task(CreateTaskRequest {
            title: "Prepare the quarterly review".to_string(),
            description: Some(description),
            assignee: Some(employee_name.clone()),
            ..Default::default()
        })?
        .id
        .clone();
    info!(
        "{} now has {} unread notification(s)",
        employee_name,
        state.unread_count(&employee_id)
    );

    // ...and asks the employee for a written report.
    let request_id = state
        .create_report_request(CreateReportRequest {
            title: "Weekly Report".to_string(),
            assigned_user_ids: vec![employee_id.clone()],
            ..Default::default()
        })?
        .id
        .clone();

    // The employee picks the task up and hands the report in.
    state.login(&employee_id, "123")?;
    state.move_task(&task_id, taskdesk::task::TaskStatus::InProgress)?;

    let mut table = Grid::new(3, 3);
    table.paste(0, 0, "Metric\tPlan\tActual\nSignups\t100\t118");
    table.toggle_bold(0, 0)?;
    let submission_id = state
        .submit_report(SubmitReportRequest {
            request_id,
            content: Some("Numbers are trending up.".to_string()),
            table_data: Some(table),
            files: Some(vec!["weekly.pdf".to_string()]),
        })?
        .id
        .clone();

    // The admin reviews and approves.
    state.login(&admin_id, "123")?;
    state.review_submission(&submission_id, ReportStatus::Approved, Some("Well done".to_string()))?;

    info!(
        "scenario complete: {} task(s), {} submission(s), {} notification(s)",
        state.tasks.len(),
        state.report_submissions.len(),
        state.notifications.len()
    );
    Ok(())
}

fn find_id(state: &AppState, role: Role) -> String {
    state
        .users
        .iter()
        .find(|u| u.role == role)
        .map(|u| u.id.clone())
        .expect("seed fixtures cover every role")
}
