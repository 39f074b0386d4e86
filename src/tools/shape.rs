// src/tools/shape.rs
//
// Providers are not consistent about where they put the payload. A tool
// lists the layouts it accepts, most likely first, and takes the first hit.

use serde_json::Value;
use tracing::error;

use crate::blockchain::models::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Array,
    Object,
    String,
}

impl JsonKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            JsonKind::Array => value.is_array(),
            JsonKind::Object => value.is_object(),
            JsonKind::String => value.is_string(),
        }
    }
}

/// One accepted response layout: a JSON pointer and the kind expected there.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub pointer: &'static str,
    pub kind: JsonKind,
}

impl Shape {
    pub const fn new(pointer: &'static str, kind: JsonKind) -> Self {
        Self { pointer, kind }
    }

    pub fn extract<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        body.pointer(self.pointer)
            .filter(|value| self.kind.matches(value))
    }
}

/// First matching shape wins; no match is an `UpstreamFormat` error.
pub fn unwrap_first<'a>(
    body: &'a Value,
    shapes: &[Shape],
    what: &str,
) -> Result<&'a Value, ToolError> {
    shapes
        .iter()
        .find_map(|shape| shape.extract(body))
        .ok_or_else(|| {
            error!(response = %body, "Unrecognised {} response", what);
            ToolError::UpstreamFormat(format!("Unexpected {} response format", what))
        })
}
