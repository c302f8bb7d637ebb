use sea_orm::{DbErr, SqlErr};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("user `{0}` already exists")]
    DuplicateUser(String),

    #[error("user `{username}` or movie {movie_id} does not exist")]
    MissingReference { username: String, movie_id: i32 },

    #[error("invalid release date `{input}`, expected dd-mm-YYYY")]
    InvalidDate {
        input: String,
        #[source]
        source: jiff::Error,
    },

    #[error("invalid movie id `{0}`")]
    InvalidMovieId(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
