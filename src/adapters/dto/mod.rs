pub mod department_dto;
pub mod user_dto;
