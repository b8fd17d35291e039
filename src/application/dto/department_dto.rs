use crate::domain::models::remote::RemoteReference;

/// Partial-update fields for a department. `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct DepartmentDTO {
    pub name: Option<String>,
    pub image_reference: Option<RemoteReference>,
}
