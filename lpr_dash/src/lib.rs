pub mod app_cfg;
pub mod app_ctx;
pub mod error;
pub mod dash;
pub mod services;
pub mod web;
