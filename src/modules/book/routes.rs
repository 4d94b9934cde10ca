//! HTTP handlers for the book catalog operations.
//!
//! Success bodies use the status-wrapped convention:
//! `{"status": "success", "message"?, "book"?, "books"?}`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use estante_http::error::AppError;

use super::models::{NewBook, UpdateBook};
use super::repository::BookRepository;

/// Build the book router with the repository baked in as state.
pub fn router(repo: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repo)
}

/// GET / — every stored book.
async fn list_books(State(repo): State<BookRepository>) -> Result<Json<Value>, AppError> {
    let books = repo.list_all().await?;
    Ok(Json(json!({
        "status": "success",
        "books": books,
    })))
}

/// GET /{id} — one book by id.
async fn get_book(
    State(repo): State<BookRepository>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let book = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;
    Ok(Json(json!({
        "status": "success",
        "book": book,
    })))
}

/// POST / — register a new book.
async fn create_book(
    State(repo): State<BookRepository>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(input) = payload?;

    // Advisory pre-check for the common duplicate case; the unique index on
    // (name, author) catches the racing create.
    if repo
        .find_by_name_author(&input.name, &input.author)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Book already exists"));
    }

    let book = repo.insert(&input).await?;
    tracing::info!(id = book.id, name = %book.name, "book registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "book": book,
        })),
    ))
}

/// PUT /{id} — full replace of every mutable field.
async fn update_book(
    State(repo): State<BookRepository>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(input) = payload?;

    let book = repo
        .replace(id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;
    tracing::info!(id = book.id, "book updated");

    Ok(Json(json!({
        "status": "success",
        "message": "Book updated",
        "book": book,
    })))
}

/// DELETE /{id} — remove the book.
async fn delete_book(
    State(repo): State<BookRepository>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !repo.delete(id).await? {
        return Err(AppError::not_found("Book not found"));
    }
    tracing::info!(id, "book deleted");

    Ok(Json(json!({
        "status": "success",
        "message": "Book deleted",
    })))
}
