pub mod post;
pub mod types;

pub use post::{PostRecord, Submission};
pub use types::{BinaryClass, Medium, Split};
