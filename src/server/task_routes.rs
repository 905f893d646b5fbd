//! `/api/tasks*` handlers.

use super::AppState;
use crate::auth::{CurrentUser, blocking};
use crate::error::{ApiError, ApiResult};
use crate::types::TaskStats;
use crate::validation::{
    TaskInput, TaskUpdateInput, validate_new_task, validate_pagination, validate_task_update,
};
use crate::views::{FilterCriteria, TaskView, task_stats, task_views};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/stats", get(stats))
        .route(
            "/api/tasks/{id}",
            get(get_task)
                .put(update_task)
                .patch(toggle_task)
                .delete(delete_task),
        )
}

/// Query string for `GET /api/tasks`. Values stay raw; unknown selector values
/// match nothing rather than failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl TaskQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_params(
            self.category.as_deref(),
            self.priority.as_deref(),
            self.status.as_deref(),
            self.search.as_deref(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskView>,
    /// Matching tasks before paging.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

async fn list_tasks(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> ApiResult<Json<TaskListResponse>> {
    let Query(query) = query.map_err(ApiError::invalid_body)?;
    let pagination = validate_pagination(
        query.page.as_deref(),
        query.limit.as_deref(),
        state.config.tasks.default_page_size,
    )?;

    let db = state.db.clone();
    let tasks = blocking(move || db.list_tasks(&user.user_id)).await?;

    let views = task_views(&tasks, &query.criteria(), &state.classifier(), state.now());
    let total = views.len();
    let views = match pagination {
        Some(p) => views
            .into_iter()
            .skip(p.skip())
            .take(p.limit as usize)
            .collect(),
        None => views,
    };

    Ok(Json(TaskListResponse {
        tasks: views,
        total,
        page: pagination.map(|p| p.page),
        limit: pagination.map(|p| p.limit),
    }))
}

async fn create_task(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    let Json(input) = body.map_err(ApiError::invalid_body)?;
    let new_task = validate_new_task(&input)?;

    let db = state.db.clone();
    let task = blocking(move || db.create_task(&user.user_id, &new_task)).await?;
    info!(user_id = %task.user_id, task_id = %task.id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(TaskView::new(task, &state.classifier(), state.now())),
    ))
}

async fn stats(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Json<TaskStats>> {
    let db = state.db.clone();
    let tasks = blocking(move || db.list_tasks(&user.user_id)).await?;
    Ok(Json(task_stats(&tasks, state.now())))
}

async fn get_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskView>> {
    let db = state.db.clone();
    let task = blocking(move || db.get_task(&user.user_id, &id))
        .await?
        .ok_or_else(ApiError::task_not_found)?;
    Ok(Json(TaskView::new(task, &state.classifier(), state.now())))
}

async fn update_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<TaskUpdateInput>, JsonRejection>,
) -> ApiResult<Json<TaskView>> {
    let Json(input) = body.map_err(ApiError::invalid_body)?;
    let update = validate_task_update(&input)?;

    let db = state.db.clone();
    let task = blocking(move || db.update_task(&user.user_id, &id, &update))
        .await?
        .ok_or_else(ApiError::task_not_found)?;
    info!(user_id = %task.user_id, task_id = %task.id, "Task updated");

    Ok(Json(TaskView::new(task, &state.classifier(), state.now())))
}

async fn toggle_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskView>> {
    let db = state.db.clone();
    let task = blocking(move || db.toggle_task(&user.user_id, &id))
        .await?
        .ok_or_else(ApiError::task_not_found)?;
    info!(
        user_id = %task.user_id,
        task_id = %task.id,
        completed = task.completed,
        "Task toggled"
    );

    Ok(Json(TaskView::new(task, &state.classifier(), state.now())))
}

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

async fn delete_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let db = state.db.clone();
    let user_id = user.user_id.clone();
    let task_id = id.clone();
    let deleted = blocking(move || db.delete_task(&user_id, &task_id)).await?;
    if !deleted {
        return Err(ApiError::task_not_found());
    }
    info!(user_id = %user.user_id, task_id = %id, "Task deleted");

    Ok(Json(Message {
        message: "Task deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, TaskStatus};
    use crate::views::Selector;

    #[test]
    fn query_builds_criteria() {
        let query = TaskQuery {
            category: Some("work".into()),
            status: Some("completed".into()),
            search: Some("report".into()),
            ..TaskQuery::default()
        };
        let criteria = query.criteria();
        assert_eq!(criteria.category, Selector::Only(Category::Work));
        assert_eq!(criteria.status, Selector::Only(TaskStatus::Completed));
        assert_eq!(criteria.priority, Selector::All);
        assert_eq!(criteria.search, "report");
    }
}
