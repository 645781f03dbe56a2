// src/models/mod.rs

pub mod participation;
pub mod question;
pub mod ranking;
pub mod trivia;
pub mod user;
