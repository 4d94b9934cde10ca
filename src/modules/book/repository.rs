//! Record store for books, backed by the SQLite pool.

use sqlx::SqlitePool;

use estante_db::Database;
use estante_http::error::AppError;

use super::models::{Book, NewBook, UpdateBook};

const BOOK_COLUMNS: &str =
    "id, name, author, genre, num_pages, des_synopsis, flg_completed, des_observacao";

/// Repository exposing the book record-store operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl From<&Database> for BookRepository {
    fn from(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every stored book, in insertion (rowid) order.
    pub async fn list_all(&self) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as(&format!("SELECT {BOOK_COLUMNS} FROM book ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(books)
    }

    /// Lookup by primary key.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as(&format!("SELECT {BOOK_COLUMNS} FROM book WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(book)
    }

    /// Uniqueness pre-check for create.
    pub async fn find_by_name_author(
        &self,
        name: &str,
        author: &str,
    ) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as(&format!(
            "SELECT {BOOK_COLUMNS} FROM book WHERE name = ? AND author = ?"
        ))
        .bind(name)
        .bind(author)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(book)
    }

    /// Insert a book and return it with its assigned id.
    ///
    /// A `(name, author)` unique-index violation surfaces as a conflict;
    /// this is what makes two racing creates safe without a pre-insert lock.
    pub async fn insert(&self, book: &NewBook) -> Result<Book, AppError> {
        let book = sqlx::query_as(&format!(
            "INSERT INTO book (name, author, genre, num_pages, des_synopsis, flg_completed, des_observacao) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.name)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.num_pages)
        .bind(&book.des_synopsis)
        .bind(book.flg_completed)
        .bind(&book.des_observacao)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(book)
    }

    /// Overwrite every mutable field of the book with the given id.
    ///
    /// Full replace, not a partial patch. Returns `None` when the id is
    /// absent.
    pub async fn replace(&self, id: i64, book: &UpdateBook) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as(&format!(
            "UPDATE book SET name = ?, author = ?, genre = ?, num_pages = ?, \
             des_synopsis = ?, flg_completed = ?, des_observacao = ? \
             WHERE id = ? RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.name)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.num_pages)
        .bind(&book.des_synopsis)
        .bind(book.flg_completed)
        .bind(&book.des_observacao)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(book)
    }

    /// Remove the book with the given id; `false` when it was absent.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected() > 0)
    }
}

/// Map storage failures to the HTTP error taxonomy: a unique-constraint
/// violation is a duplicate book, everything else is internal.
fn storage_error(error: sqlx::Error) -> AppError {
    if error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        AppError::conflict("Book already exists")
    } else {
        AppError::Internal(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::book::test_support::test_repository;

    fn sample_book() -> NewBook {
        NewBook {
            name: "1984".to_string(),
            author: "George Orwell".to_string(),
            genre: "Distopia".to_string(),
            num_pages: 328,
            des_synopsis: Some("Big Brother is watching".to_string()),
            flg_completed: true,
            des_observacao: None,
        }
    }

    fn sample_update() -> UpdateBook {
        UpdateBook {
            name: "1984".to_string(),
            author: "George Orwell".to_string(),
            genre: "Distopia".to_string(),
            num_pages: 328,
            des_synopsis: Some("Big Brother is watching".to_string()),
            flg_completed: true,
            des_observacao: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_echoes_fields() {
        let (repo, db) = test_repository().await;

        let created = repo.insert(&sample_book()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "1984");
        assert_eq!(created.num_pages, 328);
        assert!(created.flg_completed);

        db.close().await;
    }

    #[tokio::test]
    async fn duplicate_name_author_is_a_conflict() {
        let (repo, db) = test_repository().await;

        repo.insert(&sample_book()).await.unwrap();
        let error = repo.insert(&sample_book()).await.unwrap_err();
        assert!(matches!(error, AppError::Conflict(_)));

        // The failed insert must not have altered the store.
        assert_eq!(repo.list_all().await.unwrap().len(), 1);

        db.close().await;
    }

    #[tokio::test]
    async fn find_by_name_author_matches_exactly() {
        let (repo, db) = test_repository().await;
        repo.insert(&sample_book()).await.unwrap();

        let found = repo
            .find_by_name_author("1984", "George Orwell")
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = repo
            .find_by_name_author("1984", "Aldous Huxley")
            .await
            .unwrap();
        assert!(missing.is_none());

        db.close().await;
    }

    #[tokio::test]
    async fn replace_overwrites_all_fields() {
        let (repo, db) = test_repository().await;
        let created = repo.insert(&sample_book()).await.unwrap();

        let mut updated = sample_update();
        updated.num_pages = 330;
        updated.des_observacao = Some("emprestado".to_string());

        let replaced = repo.replace(created.id, &updated).await.unwrap().unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.num_pages, 330);
        assert_eq!(replaced.des_observacao.as_deref(), Some("emprestado"));

        db.close().await;
    }

    #[tokio::test]
    async fn replace_and_delete_on_absent_id() {
        let (repo, db) = test_repository().await;

        assert!(repo.replace(42, &sample_update()).await.unwrap().is_none());
        assert!(!repo.delete(42).await.unwrap());

        db.close().await;
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (repo, db) = test_repository().await;
        let created = repo.insert(&sample_book()).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(repo.list_all().await.unwrap().is_empty());

        db.close().await;
    }
}
