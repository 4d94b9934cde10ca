pub mod models;
pub mod repository;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use estante_kernel::{AppCtx, Migration, Module};

use self::repository::BookRepository;

/// The book catalog module: routes, schema, and documentation.
pub struct BookModule;

impl BookModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BookModule {
    fn name(&self) -> &'static str {
        "book"
    }

    async fn init(&self, ctx: &AppCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "book module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &AppCtx<'_>) -> Router {
        routes::router(BookRepository::from(ctx.db))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every stored book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": {
                                                    "type": "string",
                                                    "enum": ["success"]
                                                },
                                                "books": {
                                                    "type": "array",
                                                    "items": {
                                                        "$ref": "#/components/schemas/Book"
                                                    }
                                                }
                                            },
                                            "required": ["status", "books"]
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Register a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/NewBook"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created with its assigned id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookEnvelope"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Malformed body or missing required field",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "409": {
                                "description": "A book with the same name and author already exists",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "integer"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The requested book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookEnvelope"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Replace every mutable field of a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "integer"
                                }
                            }
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/UpdateBook"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookEnvelope"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Malformed body or missing required field",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": {
                                    "type": "integer"
                                }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Book deleted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": {
                                                    "type": "string",
                                                    "enum": ["success"]
                                                },
                                                "message": {
                                                    "type": "string"
                                                }
                                            },
                                            "required": ["status", "message"]
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "description": "System-assigned identifier"
                            },
                            "name": {
                                "type": "string",
                                "maxLength": 80
                            },
                            "author": {
                                "type": "string",
                                "maxLength": 30
                            },
                            "genre": {
                                "type": "string",
                                "maxLength": 10
                            },
                            "num_pages": {
                                "type": "integer"
                            },
                            "des_synopsis": {
                                "type": "string",
                                "maxLength": 100,
                                "nullable": true
                            },
                            "flg_completed": {
                                "type": "boolean"
                            },
                            "des_observacao": {
                                "type": "string",
                                "maxLength": 50,
                                "nullable": true
                            }
                        },
                        "required": ["id", "name", "author", "genre", "num_pages", "flg_completed"]
                    },
                    "NewBook": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "maxLength": 80
                            },
                            "author": {
                                "type": "string",
                                "maxLength": 30
                            },
                            "genre": {
                                "type": "string",
                                "maxLength": 10
                            },
                            "num_pages": {
                                "type": "integer"
                            },
                            "des_synopsis": {
                                "type": "string",
                                "maxLength": 100,
                                "nullable": true
                            },
                            "flg_completed": {
                                "type": "boolean",
                                "default": false
                            },
                            "des_observacao": {
                                "type": "string",
                                "maxLength": 50,
                                "nullable": true
                            }
                        },
                        "required": ["name", "author", "genre", "num_pages"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "maxLength": 80
                            },
                            "author": {
                                "type": "string",
                                "maxLength": 30
                            },
                            "genre": {
                                "type": "string",
                                "maxLength": 10
                            },
                            "num_pages": {
                                "type": "integer"
                            },
                            "des_synopsis": {
                                "type": "string",
                                "maxLength": 100,
                                "nullable": true
                            },
                            "flg_completed": {
                                "type": "boolean"
                            },
                            "des_observacao": {
                                "type": "string",
                                "maxLength": 50,
                                "nullable": true
                            }
                        },
                        "required": ["name", "author", "genre", "num_pages", "flg_completed"]
                    },
                    "BookEnvelope": {
                        "type": "object",
                        "properties": {
                            "status": {
                                "type": "string",
                                "enum": ["success"]
                            },
                            "message": {
                                "type": "string"
                            },
                            "book": {
                                "$ref": "#/components/schemas/Book"
                            }
                        },
                        "required": ["status", "book"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_book",
            up: r#"
                CREATE TABLE IF NOT EXISTS book (
                    id             INTEGER PRIMARY KEY AUTOINCREMENT,
                    name           VARCHAR(80)  NOT NULL,
                    author         VARCHAR(30)  NOT NULL,
                    genre          VARCHAR(10)  NOT NULL,
                    num_pages      INTEGER      NOT NULL,
                    des_synopsis   VARCHAR(100),
                    flg_completed  BOOLEAN      NOT NULL DEFAULT 0,
                    des_observacao VARCHAR(50)
                );
                CREATE UNIQUE INDEX IF NOT EXISTS book_name_author_unique
                    ON book (name, author);
                "#,
        }]
    }

    async fn start(&self, _ctx: &AppCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module stopped");
        Ok(())
    }
}

/// Create a new instance of the book module.
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BookModule::new())
}
