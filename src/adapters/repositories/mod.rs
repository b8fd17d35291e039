mod pg_department_repository;

pub use pg_department_repository::PgDepartmentRepository;
