use std::collections::HashMap;

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    NewUserSkill, Role, Skill, UserSkill, UserSkillUpdate, ValidationErrors, DEFAULT_INTEREST_LEVEL,
};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiJson};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

/// Roles that may rate skills even when self-assessment is switched off.
const ASSESSORS: [Role; 3] = [Role::Admin, Role::Hr, Role::Pm];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateRequest {
    pub skill_id: String,
    pub proficiency_level: Option<i16>,
    pub interest_level: Option<i16>,
    pub is_current: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRef {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
}

/// A user skill with its skill expanded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkillView {
    pub id: Uuid,
    pub user: Uuid,
    pub skill: Option<SkillRef>,
    pub proficiency_level: i16,
    pub interest_level: i16,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSkillView {
    fn new(user_skill: UserSkill, skill: Option<&Skill>) -> Self {
        Self {
            id: user_skill.id,
            user: user_skill.user,
            skill: skill.map(|s| SkillRef {
                id: s.id,
                name: s.name.clone(),
                category: s.category.clone(),
            }),
            proficiency_level: user_skill.proficiency_level,
            interest_level: user_skill.interest_level,
            is_current: user_skill.is_current,
            created_at: user_skill.created_at,
            updated_at: user_skill.updated_at,
        }
    }
}

/// GET /api/user-skills - the caller's skills
pub async fn list(State(state): State<AppState>, user: SessionUser) -> ApiResult<Vec<UserSkillView>> {
    let user_skills = state.store.list_user_skills(user.id).await?;
    let skills: HashMap<Uuid, Skill> = state
        .store
        .list_skills()
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let views = user_skills
        .into_iter()
        .map(|us| {
            let skill = skills.get(&us.skill);
            UserSkillView::new(us, skill)
        })
        .collect();
    Ok(ApiResponse::success(views))
}

/// POST /api/user-skills - rate a skill for the caller
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateRequest>,
) -> ApiResult<UserSkillView> {
    let skill_id = parse_id(&body.skill_id, "skill")?;
    let Some(proficiency_level) = body.proficiency_level else {
        let mut errors = ValidationErrors::default();
        errors.push("proficiencyLevel is required");
        return Err(errors.into());
    };

    ensure_self_assessment(&state, &user).await?;

    let skill = state
        .store
        .find_skill(skill_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;
    let profile = user.profile(&state).await?;

    let user_skill = state
        .store
        .create_user_skill(NewUserSkill {
            user: profile.id,
            skill: skill.id,
            proficiency_level,
            interest_level: body.interest_level.unwrap_or(DEFAULT_INTEREST_LEVEL),
            is_current: body.is_current.unwrap_or(true),
        })
        .await?;

    Ok(ApiResponse::created(UserSkillView::new(user_skill, Some(&skill))))
}

/// PUT /api/user-skills/:id - owner only
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<UserSkillUpdate>,
) -> ApiResult<UserSkillView> {
    let id = parse_id(&id, "user skill")?;
    owned_user_skill(&state, &user, id).await?;
    ensure_self_assessment(&state, &user).await?;

    let user_skill = state
        .store
        .update_user_skill(id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("User skill not found"))?;
    let skill = state.store.find_skill(user_skill.skill).await?;

    Ok(ApiResponse::success(UserSkillView::new(user_skill, skill.as_ref())))
}

/// DELETE /api/user-skills/:id - owner only
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "user skill")?;
    owned_user_skill(&state, &user, id).await?;

    if !state.store.delete_user_skill(id).await? {
        return Err(ApiError::not_found("User skill not found"));
    }
    Ok(ApiResponse::fields().with("message", "User skill deleted"))
}

async fn owned_user_skill(state: &AppState, user: &SessionUser, id: Uuid) -> Result<UserSkill, ApiError> {
    let user_skill = state
        .store
        .find_user_skill(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User skill not found"))?;

    if user_skill.user != user.id {
        return Err(ApiError::forbidden("Not authorized to modify this user skill"));
    }
    Ok(user_skill)
}

async fn ensure_self_assessment(state: &AppState, user: &SessionUser) -> Result<(), ApiError> {
    let settings = state.store.load_settings().await?;
    if settings.allow_self_assessment || user.has_role(&ASSESSORS) {
        return Ok(());
    }
    Err(ApiError::forbidden("Self-assessment is disabled"))
}
