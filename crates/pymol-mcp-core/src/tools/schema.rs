use serde_json::{Map, Value, json};

/// Builder for the JSON Schema object describing a tool's arguments.
#[derive(Debug, Default)]
pub struct InputSchema {
    properties: Map<String, Value>,
    required: Vec<&'static str>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(mut self, name: &'static str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description }),
        );
        self.required.push(name);
        self
    }

    pub fn string_or(mut self, name: &'static str, default: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description, "default": default }),
        );
        self
    }

    pub fn integer_or(mut self, name: &'static str, default: i64, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "integer", "description": description, "default": default }),
        );
        self
    }

    pub fn boolean_or(mut self, name: &'static str, default: bool, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "boolean", "description": description, "default": default }),
        );
        self
    }

    pub fn into_value(self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }
}
