pub mod account;
pub mod calendar_event;
pub mod client;
pub mod hosting;
pub mod notification;
pub mod project;
pub mod service;
pub mod user_settings;
