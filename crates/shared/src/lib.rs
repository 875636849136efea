mod env;
pub use env::{APP_ENV, AppEnv};

mod error;
pub use error::AppError;
