use serde::{Deserialize, Serialize};

/// A persisted book. Field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// System-assigned identifier, immutable once created.
    pub id: i64,
    pub name: String,
    pub author: String,
    pub genre: String,
    pub num_pages: i64,
    pub des_synopsis: Option<String>,
    pub flg_completed: bool,
    pub des_observacao: Option<String>,
}

/// Request payload for registering a book.
///
/// `name`, `author`, `genre`, and `num_pages` are required; the synopsis and
/// observation fields may be omitted or null, and `flg_completed` defaults
/// to false when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub num_pages: i64,
    #[serde(default)]
    pub des_synopsis: Option<String>,
    #[serde(default)]
    pub flg_completed: bool,
    #[serde(default)]
    pub des_observacao: Option<String>,
}

/// Request payload for a full replace of a book's mutable fields.
///
/// Unlike registration, `flg_completed` has no default: a replace that
/// omitted it would silently reset the stored value, so the field must be
/// stated explicitly. The two optional strings may still be null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBook {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub num_pages: i64,
    #[serde(default)]
    pub des_synopsis: Option<String>,
    pub flg_completed: bool,
    #[serde(default)]
    pub des_observacao: Option<String>,
}
