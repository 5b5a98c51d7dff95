//! Screen view models.
//!
//! Each screen owns its draft state and exposes action methods that read and
//! write through [`Database`](crate::db::Database). Models are plain data:
//! the embedding front end renders them however it likes and owns every
//! confirmation prompt and alert. A failed action leaves the model as it
//! was.

mod research_form;
mod room_detail;
mod rooms;
mod settings;

pub use research_form::*;
pub use room_detail::*;
pub use rooms::*;
pub use settings::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::FieldParseError;

/// View-layer errors: a validation problem with a user-facing message, or a
/// persistence failure passed through untouched.
#[derive(Error, Debug)]
pub enum UiError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Field(#[from] FieldParseError),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type UiResult<T> = Result<T, UiError>;
