pub mod error;
pub mod service;

pub use error::TutorServiceError;
pub use service::{TutorReply, TutorRequest, TutorService, TutorServiceApi};
