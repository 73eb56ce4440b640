pub mod products;
pub mod validation;

pub use products::{ApiError, ProductService};
pub use validation::{FieldErrors, Mode};
