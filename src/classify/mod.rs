pub mod title;
pub mod validate;
pub mod wordlists;

pub use title::{extract_medium_from_title, medium_field, TitleError};
pub use validate::{validate_submission, Rejection};
