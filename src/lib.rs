pub mod commands;
pub mod config;
pub mod controller;
pub mod database;
pub mod observer;
pub mod quiz;
pub mod schema;
pub mod state;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
