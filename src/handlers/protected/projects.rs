use std::collections::HashMap;

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::database::models::{NewProject, Project, ProjectDetail, Role, UserSummary};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiJson};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

/// GET /api/projects - every project, managers expanded
pub async fn list(State(state): State<AppState>, _user: SessionUser) -> ApiResult<Vec<ProjectDetail>> {
    let projects = state.store.list_projects().await?;

    let mut managers: HashMap<Uuid, Option<UserSummary>> = HashMap::new();
    for project in &projects {
        if !managers.contains_key(&project.project_manager) {
            let manager = state.store.find_user(project.project_manager).await?;
            managers.insert(project.project_manager, manager.as_ref().map(UserSummary::from));
        }
    }

    let details = projects
        .into_iter()
        .map(|project| {
            let manager = managers.get(&project.project_manager).cloned().flatten();
            ProjectDetail::new(project, manager)
        })
        .collect();
    Ok(ApiResponse::success(details))
}

/// GET /api/projects/:id - the id is checked before the store is touched
pub async fn show(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(id): Path<String>,
) -> ApiResult<ProjectDetail> {
    let id = parse_id(&id, "project")?;

    let project = state
        .store
        .find_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    let manager = state.store.find_user(project.project_manager).await?;

    Ok(ApiResponse::success(ProjectDetail::new(
        project,
        manager.as_ref().map(UserSummary::from),
    )))
}

/// POST /api/projects - admin/pm; the caller manages it unless told otherwise
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(mut project): ApiJson<NewProject>,
) -> ApiResult<Project> {
    user.require_role(&[Role::Admin, Role::Pm])?;

    if project.project_manager.is_none() {
        project.project_manager = Some(user.profile(&state).await?.id);
    }
    let project = state.store.create_project(project).await?;

    tracing::info!(project = %project.id, name = %project.name, by = %user.id, "Project created");
    Ok(ApiResponse::created(project))
}
