pub mod error;
pub mod service;

pub use error::StudentServiceError;
pub use service::{AddStudentRequest, EnrolledStudent, StudentService, StudentServiceApi};
