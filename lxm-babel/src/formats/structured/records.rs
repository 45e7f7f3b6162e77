//! Record types of the structured form
//!
//! ```json
//! [
//!   { "command": { "name": "tool.set", "prefix": "", "suppress": false, "comment": [],
//!                  "args": [ { "argName": "preset", "value": "prim.cube", ... } ] } },
//!   { "command block": { "name": "Setup", "suppress": false, "comment": [],
//!                        "commands": [ ... ] } }
//! ]
//! ```
//!
//! The descriptive argument fields (`argUsername`, `argType`, ...) are written from the
//! schema for readers of the file and ignored when reading: the schema stays authoritative.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    #[serde(rename = "command")]
    Command(CommandRecord),
    #[serde(rename = "command block")]
    Block(BlockRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suppress: bool,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub args: Vec<ArgRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub name: String,
    #[serde(default)]
    pub suppress: bool,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub commands: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgRecord {
    pub arg_name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub as_string: bool,
    #[serde(default)]
    pub arg_username: String,
    #[serde(default)]
    pub arg_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_type_name: Option<String>,
    #[serde(default)]
    pub arg_desc: String,
    #[serde(default)]
    pub arg_example: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Hand written files may give numbers and booleans as bare scalars.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(Value::Bool(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "argument value must be a scalar, found {}",
            other
        ))),
    }
}
