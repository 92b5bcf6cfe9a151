use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::validation::ValidationError;

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::Validation(e) => e.into(),
            DoctorError::Store(e) => e.into(),
        }
    }
}
