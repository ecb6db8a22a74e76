//! # Source SDK identity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{SchemaError, SchemaResult};

/// SDK a plugin was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sdk {
    /// Go (TinyGo) functions SDK
    #[serde(rename = "functions-go")]
    Go,

    /// AssemblyScript functions SDK
    #[serde(rename = "functions-as")]
    AssemblyScript,
}

impl Sdk {
    /// SDK id as written in plugin metadata
    pub fn id(&self) -> &'static str {
        match self {
            Sdk::Go => "functions-go",
            Sdk::AssemblyScript => "functions-as",
        }
    }

    /// Parse an SDK identity such as `functions-go@0.10.0`
    pub fn parse(s: &str) -> SchemaResult<Self> {
        let (name, _) = parse_name_and_version(s);
        match name {
            "functions-go" => Ok(Sdk::Go),
            "functions-as" => Ok(Sdk::AssemblyScript),
            _ => Err(SchemaError::UnsupportedSdk(s.to_string())),
        }
    }
}

impl fmt::Display for Sdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Split `name@version` at the last `@`
pub fn parse_name_and_version(s: &str) -> (&str, Option<&str>) {
    match s.rfind('@') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    }
}
