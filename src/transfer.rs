//! CSV import and export of the trivia data set.
//!
//! A data directory holds `categories.csv` and `questions.csv`, one row per
//! record with a header line. Ids are kept on both sides so questions keep
//! pointing at their categories.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};
use crate::db::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        dir.display()
    );
    import_categories(pool, categories)
        .await
        .context("Cannot import categories")?;
    import_questions(pool, questions)
        .await
        .context("Cannot import questions")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::{categories, questions};
    use crate::db::test_pool;

    #[tokio::test]
    async fn export_then_import_keeps_rows_and_ids() {
        let source = test_pool().await;
        let sports = categories::create_category(&source, "Sports").await.unwrap();
        questions::create_question(&source, "Who won the 2014 World Cup?", "Germany", Some(sports), Some(3))
            .await
            .unwrap();
        let orphan = questions::create_question(&source, "Unsorted, with a comma", "Yes", None, None)
            .await
            .unwrap();
        questions::delete_question(&source, orphan - 1).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        export_data(&source, &out).await.unwrap();
        assert!(out.join(CATEGORIES_FILE).exists());

        let target = test_pool().await;
        import_data(&target, &out).await.unwrap();

        assert_eq!(
            categories::get_all_categories(&target).await.unwrap(),
            categories::get_all_categories(&source).await.unwrap()
        );
        assert_eq!(
            questions::get_all_questions(&target).await.unwrap(),
            questions::get_all_questions(&source).await.unwrap()
        );
        let imported = questions::get_question_by_id(&target, orphan)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(imported.category, None);
        assert_eq!(imported.question, "Unsorted, with a comma");
    }

    #[tokio::test]
    async fn bundled_data_set_imports() {
        let pool = test_pool().await;
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        import_data(&pool, &dir).await.unwrap();

        assert_eq!(categories::get_all_categories(&pool).await.unwrap().len(), 6);
        assert_eq!(questions::count_questions(&pool).await.unwrap(), 19);
        let escher = questions::get_question_by_id(&pool, 16).await.unwrap().unwrap();
        assert_eq!(escher.answer, "Escher");
    }

    #[tokio::test]
    async fn import_fails_without_files() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        assert!(import_data(&pool, dir.path()).await.is_err());
    }
}
