use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_category,
            questions::{get_all_questions, get_questions_for_category},
        },
        Question,
    },
    server::{app::AppState, error::ApiError},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

/// Category id the client sends to play across every category.
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize, Debug)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct QuizRequest {
    quiz_category: Option<QuizCategory>,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Option<Question>,
}

/// Round-robin pick over `candidates`: the one at position `asked`, or the first once exhausted.
fn next_question(candidates: &[Question], asked: usize) -> Option<&Question> {
    candidates.get(asked).or_else(|| candidates.first())
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizResponse>> {
    let Json(request) = payload.map_err(ApiError::bad_request)?;
    let category = request
        .quiz_category
        .and_then(|c| c.id)
        .ok_or_else(|| ApiError::bad_request("quiz_category.id is required"))?;

    let candidates = if category == ALL_CATEGORIES {
        get_all_questions(&pool).await?
    } else {
        if get_category(&pool, category).await?.is_none() {
            return Err(ApiError::not_found(format!("category {category}")));
        }
        get_questions_for_category(&pool, category).await?
    };

    let question = next_question(&candidates, request.previous_questions.len()).cloned();
    if question.is_some() {
        let label = match category {
            ALL_CATEGORIES => "all".to_owned(),
            id => id.to_string(),
        };
        QUIZ_QUESTIONS_SERVED
            .with_label_values(&[label.as_str()])
            .inc();
    }

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
