pub mod department_controller;
pub mod health_controller;
pub mod user_controller;
