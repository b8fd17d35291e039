pub mod controllers;
pub mod dto;
mod error;
pub mod repositories;
pub mod state;
