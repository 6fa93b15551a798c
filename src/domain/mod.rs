pub mod ai;
pub mod auth;
pub mod billing;
pub mod content;
pub mod credits;
pub mod email;
pub mod organization;
pub mod quota;
pub mod shared;
pub mod student;
pub mod tutor;
pub mod usage;
pub mod user;
