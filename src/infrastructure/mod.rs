pub mod auth;
pub mod config;
pub mod db;
pub mod gateways;
pub mod http;
pub mod repositories;
