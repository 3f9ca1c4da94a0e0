use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{
        categories::{get_category, get_category_map, CategoryMap},
        questions::get_questions_for_category,
    },
    server::{
        app::AppState,
        error::ApiError,
        extract::{ApiPath, ApiQuery},
        pagination::{paginate, PageQuery},
    },
};

use super::{questions::QuestionsPage, ApiResponse};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    // listing failures have always been reported to clients as 405
    let categories = get_category_map(&pool).await.map_err(|e| {
        tracing::error!("Cannot list categories: {e}");
        ApiError::MethodNotAllowed
    })?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    if get_category(&pool, id).await?.is_none() {
        return Err(ApiError::not_found(format!("category {id}")));
    }
    let questions = get_questions_for_category(&pool, id).await?;
    let current = paginate(&questions, page);
    if current.is_empty() {
        return Err(ApiError::not_found(format!(
            "page {page} of category {id}"
        )));
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions: current.to_vec(),
        total_questions: questions.len(),
        categories: Some(get_category_map(&pool).await?),
        current_category: Some(id),
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
