use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_category, get_category_map, CategoryMap},
            questions::{
                self, get_all_questions, get_question_by_id, invalid_fields, search_questions,
            },
        },
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extract::{ApiPath, ApiQuery},
        pagination::{paginate, PageQuery},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::ApiResponse;

/// Body of `POST /questions`: a search when `searchTerm` is present, otherwise a new question.
#[derive(Deserialize, Debug)]
struct QuestionPayload {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl QuestionPayload {
    fn into_new_question(self) -> Result<NewQuestion, ApiError> {
        let (Some(question), Some(answer), Some(category), Some(difficulty)) =
            (self.question, self.answer, self.category, self.difficulty)
        else {
            return Err(ApiError::unprocessable(
                "question, answer, category and difficulty are all required",
            ));
        };
        if let Some(reason) = invalid_fields(&question, &answer, difficulty) {
            return Err(ApiError::unprocessable(reason));
        }
        Ok(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

#[derive(Serialize)]
pub(super) struct QuestionsPage {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryMap>,
    pub current_category: Option<i64>,
}

#[derive(Serialize)]
struct SingleQuestion {
    success: bool,
    question: Question,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = get_all_questions(&pool).await?;
    let current = paginate(&questions, page);
    if current.is_empty() {
        return Err(ApiError::not_found(format!("page {page} of questions")));
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions: current.to_vec(),
        total_questions: questions.len(),
        categories: Some(get_category_map(&pool).await?),
        current_category: None,
    }))
}

async fn get_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Json<SingleQuestion>> {
    let question = get_question_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("question {id}")))?;
    Ok(Json(SingleQuestion {
        success: true,
        question,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Json<Deleted>> {
    get_question_by_id(&pool, id)
        .await
        .map_err(ApiError::bad_request)?
        .ok_or_else(|| ApiError::not_found(format!("question {id}")))?;

    if !questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::bad_request)?
    {
        return Err(ApiError::not_found(format!("question {id}")));
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Deleted question");

    let remaining = get_all_questions(&pool)
        .await
        .map_err(ApiError::bad_request)?;
    Ok(Json(Deleted {
        success: true,
        deleted: id,
        questions: paginate(&remaining, 1).to_vec(),
        total_questions: remaining.len(),
    }))
}

async fn create_or_search(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
    payload: Result<Json<QuestionPayload>, JsonRejection>,
) -> ApiResponse<Response> {
    let Json(mut payload) = payload.map_err(ApiError::unprocessable)?;
    match payload.search_term.take() {
        Some(term) => Ok(search(&pool, &term, page).await?.into_response()),
        None => Ok(create(&pool, payload).await?.into_response()),
    }
}

async fn search(pool: &SqlitePool, term: &str, page: u32) -> ApiResponse<Json<QuestionsPage>> {
    let matches = search_questions(pool, term)
        .await
        .map_err(ApiError::unprocessable)?;
    tracing::debug!(term, found = matches.len(), "Searched questions");
    Ok(Json(QuestionsPage {
        success: true,
        questions: paginate(&matches, page).to_vec(),
        total_questions: matches.len(),
        categories: None,
        current_category: None,
    }))
}

async fn create(
    pool: &SqlitePool,
    payload: QuestionPayload,
) -> ApiResponse<(StatusCode, Json<Created>)> {
    let new_question = payload.into_new_question()?;
    let category = get_category(pool, new_question.category)
        .await
        .map_err(ApiError::unprocessable)?;
    if category.is_none() {
        return Err(ApiError::unprocessable(format!(
            "category {} does not exist",
            new_question.category
        )));
    }

    let id = questions::create_question(pool, &new_question)
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id, category = new_question.category, "Created question");

    let all = get_all_questions(pool)
        .await
        .map_err(ApiError::unprocessable)?;
    Ok((
        StatusCode::CREATED,
        Json(Created {
            success: true,
            created: id,
            questions: paginate(&all, 1).to_vec(),
            total_questions: all.len(),
        }),
    ))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_or_search))
        .route("/questions/results", post(create_or_search))
        .route("/questions/{id}", get(get_question).delete(delete_question))
        .with_state(state)
}
