// src/handlers/mod.rs

pub mod auth;
pub mod participation;
pub mod questions;
pub mod ranking;
pub mod trivias;
pub mod users;
