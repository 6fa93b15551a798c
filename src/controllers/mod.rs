pub mod ai;
pub mod billing;
pub mod credits;
pub mod email;
pub mod health;
pub mod lesson;
pub mod student;
pub mod tutor;
pub mod usage;
