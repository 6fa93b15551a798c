use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        auth::AuthContext,
        shared::usage_dto::{MeteredResponse, StudentCapacity},
        student::{AddStudentRequest, EnrolledStudent, StudentService, StudentServiceApi},
    },
    error::AppResult,
};

pub struct StudentController {
    student_service: Arc<StudentService>,
}

impl StudentController {
    pub fn new(student_service: Arc<StudentService>) -> Self {
        Self { student_service }
    }

    /// POST /api/students - Enroll a student
    pub async fn add_student(
        State(controller): State<Arc<StudentController>>,
        Extension(ctx): Extension<AuthContext>,
        Json(request): Json<AddStudentRequest>,
    ) -> AppResult<(StatusCode, Json<MeteredResponse<EnrolledStudent>>)> {
        let gated = controller.student_service.add_student(&ctx, request).await?;
        Ok((StatusCode::CREATED, Json(gated.into())))
    }

    /// GET /api/students/capacity - Seats used and available
    pub async fn capacity(
        State(controller): State<Arc<StudentController>>,
        Extension(ctx): Extension<AuthContext>,
    ) -> AppResult<Json<StudentCapacity>> {
        let capacity = controller.student_service.capacity(&ctx).await?;
        Ok(Json(capacity))
    }
}
