pub mod secrets;
pub mod settings;
