use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category_map, questions},
        Question,
    },
    server::{
        app::AppState,
        deserializers::deserialize_lenient_i64,
        error::ApiError,
        extract::{ApiJson, ApiPath},
    },
    telemetry::QUESTION_CHANGES_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    page: Option<i64>,
}

impl PageQuery {
    fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

// the trivia front end posts category ids from a <select>, so numbers may arrive as strings
#[derive(Deserialize)]
struct NewQuestion {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct QuestionCreated {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct QuestionDeleted {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = questions::get_questions_page(&pool, query.page()).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions: questions::count_questions(&pool).await?,
        categories: get_category_map(&pool).await?,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
    ApiJson(new_question): ApiJson<NewQuestion>,
) -> ApiResponse<QuestionCreated> {
    let non_empty = |field: Option<String>| field.filter(|value| !value.is_empty());
    let (Some(question), Some(answer)) = (
        non_empty(new_question.question),
        non_empty(new_question.answer),
    ) else {
        return Err(ApiError::BadRequest(
            "Fields question and answer must not be empty".to_owned(),
        ));
    };

    let id = questions::create_question(
        &pool,
        &question,
        &answer,
        new_question.category,
        new_question.difficulty,
    )
    .await?;
    QUESTION_CHANGES_CNTR.with_label_values(&["created"]).inc();
    tracing::info!(id, "Created question");

    Ok(Json(QuestionCreated {
        success: true,
        created: id,
        questions: questions::get_questions_page(&pool, query.page()).await?,
        total_questions: questions::count_questions(&pool).await?,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<QuestionDeleted> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    QUESTION_CHANGES_CNTR.with_label_values(&["deleted"]).inc();
    tracing::info!(id, "Deleted question");

    Ok(Json(QuestionDeleted {
        success: true,
        deleted: id,
        questions: questions::get_questions_page(&pool, query.page()).await?,
        total_questions: questions::count_questions(&pool).await?,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<SearchRequest>,
) -> ApiResponse<SearchResults> {
    let Some(term) = body.search_term else {
        return Err(ApiError::BadRequest("Missing field: searchTerm".to_owned()));
    };
    let questions = questions::search_questions(&pool, &term).await?;
    tracing::debug!(term = %term, found = questions.len(), "Searched questions");
    Ok(Json(SearchResults {
        success: true,
        total_questions: questions.len(),
        questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/api/questions", get(list_questions).post(create_question))
        .route("/api/questions/{id}", delete(delete_question))
        .route("/api/questions/search", post(search_questions))
        .with_state(state)
}
