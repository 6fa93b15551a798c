pub mod model;

pub use model::{Enrollment, User};
