use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uuid: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Display name, falling back to the email local part.
    pub fn display_name(&self) -> String {
        if let Some(ref name) = self.name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        self.email
            .as_deref()
            .map(|e| e.split('@').next().unwrap_or(e).to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
