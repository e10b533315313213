use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_random_question, Question},
    server::{app::AppState, extract::ApiJson},
    telemetry::QUIZ_QUESTIONS_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizRound {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

impl QuizRound {
    /// Category id `0` is the "All" entry of the front end.
    fn category(&self) -> Option<i64> {
        self.quiz_category
            .as_ref()
            .and_then(|c| c.id)
            .filter(|id| *id != 0)
    }
}

#[derive(Serialize)]
struct NextQuestion {
    success: bool,
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    ApiJson(round): ApiJson<QuizRound>,
) -> ApiResponse<NextQuestion> {
    let category = round.category();
    let previous = round.previous_questions.unwrap_or_default();
    let question = get_random_question(&pool, &previous, category).await?;

    if let Some(question) = &question {
        let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
        QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();
        tracing::debug!(id = question.id, previous = previous.len(), "Serving quiz question");
    } else {
        tracing::debug!(previous = previous.len(), ?category, "Quiz exhausted");
    }

    Ok(Json(NextQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/api/quizzes", post(next_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(json: &str) -> QuizRound {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn zero_or_missing_category_means_all() {
        assert_eq!(round(r#"{"previous_questions": []}"#).category(), None);
        assert_eq!(
            round(r#"{"quiz_category": {"type": "click", "id": 0}}"#).category(),
            None
        );
        assert_eq!(round(r#"{"quiz_category": {"id": null}}"#).category(), None);
    }

    #[test]
    fn category_id_may_be_a_string() {
        let r = round(r#"{"quiz_category": {"type": "Science", "id": "1"}, "previous_questions": [4, 7]}"#);
        assert_eq!(r.category(), Some(1));
        assert_eq!(r.previous_questions, Some(vec![4, 7]));
    }
}
