// Experiment domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: i64,
    pub name: String,
}

impl Experiment {
    pub fn new(id: i64, name: String) -> Self {
        let name = Self::format_name(&name);
        Self { id, name }
    }

    fn format_name(name: &str) -> String {
        name.trim().to_string()
    }
}
