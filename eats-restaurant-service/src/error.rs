use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No restaurant found with id \"{0}\"")]
    RestaurantNotFound(Uuid),
    #[error("Restaurant name, {0}, is invalid")]
    UnknownRestaurantName(String),
    #[error("Unexpected internal error")]
    Database(#[from] diesel::result::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::RestaurantNotFound(_) | StoreError::UnknownRestaurantName(_)
        )
    }
}
