pub mod usage_dto;
pub mod validation;
