//! Tool catalogue advertised through `tools/list`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Value, json};

use statute_tools::Operation;

use crate::protocol::ProtocolError;

/// Tools served by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Fetches a statute into the document store.
    DownloadLaw,
    /// Extracts one provision.
    GetParagraph,
    /// Lists a statute's provisions.
    ListContents,
}

impl ToolName {
    /// Every tool, in the order they are advertised.
    pub const ALL: [Self; 3] = [Self::DownloadLaw, Self::GetParagraph, Self::ListContents];

    /// Returns the name clients call the tool by.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DownloadLaw => "download_law",
            Self::GetParagraph => "get_paragraph",
            Self::ListContents => "list_contents",
        }
    }

    /// Dispatcher operation behind the tool.
    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::DownloadLaw => Operation::Download,
            Self::GetParagraph => Operation::GetParagraph,
            Self::ListContents => Operation::ListContents,
        }
    }

    /// Tool definition including its input schema.
    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        let law_name = json!({
            "type": "string",
            "description": "Statute identifier, for example \"estg\", \"ao_1977\", or \"bgb\""
        });
        let (description, properties, required): (&str, Value, &[&str]) = match self {
            Self::DownloadLaw => (
                "Download a statute's XML document into the local store",
                json!({
                    "law_name": law_name,
                    "force_update": {
                        "type": "boolean",
                        "description": "Replace the local copy even if it already exists"
                    }
                }),
                &["law_name"][..],
            ),
            Self::GetParagraph => (
                "Extract a provision from a statute, optionally narrowed to subsections",
                json!({
                    "paragraph": {
                        "type": "string",
                        "description": "Provision citation, for example \"§ 1\" or \"§ 70\""
                    },
                    "law_name": law_name,
                    "absatz": {
                        "type": "string",
                        "description": "Subsection number, or a list such as [1,3,5]"
                    }
                }),
                &["paragraph", "law_name"][..],
            ),
            Self::ListContents => (
                "List every provision of a statute in document order",
                json!({ "law_name": law_name }),
                &["law_name"][..],
            ),
        };

        ToolDefinition {
            name: self.as_str(),
            description,
            input_schema: json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == value)
            .ok_or_else(|| ProtocolError::unknown_tool(value))
    }
}

/// Entry in the `tools/list` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    name: &'static str,
    description: &'static str,
    input_schema: Value,
}

impl ToolDefinition {
    /// Tool name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// JSON Schema of the tool's arguments.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

/// Definitions of every served tool.
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.into_iter().map(ToolName::definition).collect()
}
