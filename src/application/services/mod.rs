pub mod binding;
pub mod identity_provider;
pub mod remote_storage;

pub use binding::DepartmentBindingService;
pub use identity_provider::IdentityProvider;
pub use remote_storage::RemoteStorage;
