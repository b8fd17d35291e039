pub mod department;
pub mod file;
pub mod remote;
