pub mod model;

pub use model::{Organization, Plan};
