//! Typed tool-call arguments.
//!
//! Argument objects are deserialised with `serde` so that missing required
//! fields and wrong types are rejected as invalid params before any field
//! validation runs. Unknown extra fields are ignored. Converting arguments to
//! an [`OperationRequest`] then applies the allow-list validators.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use statute_tools::{OperationRequest, ValidationError};

use crate::catalog::ToolName;
use crate::protocol::ProtocolError;

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallParams {
    /// Tool to run.
    pub name: String,
    /// Tool arguments; absent or `null` is treated as an empty object.
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl CallParams {
    /// Extracts call parameters from a request's `params` member.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidParams`] when `name` is missing or
    /// not a string.
    pub fn from_params(params: &Value) -> Result<Self, ProtocolError> {
        Self::deserialize(params)
            .map_err(|error| ProtocolError::invalid_params(format!("tools/call: {error}")))
    }
}

/// Arguments of `download_law`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadArguments {
    /// Statute identifier.
    pub law_name: String,
    /// Replace an existing local copy.
    #[serde(default)]
    pub force_update: bool,
}

/// Arguments of `get_paragraph`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetParagraphArguments {
    /// Provision citation.
    pub paragraph: String,
    /// Statute identifier.
    pub law_name: String,
    /// Optional subsection selector.
    #[serde(default)]
    pub absatz: Option<String>,
}

/// Arguments of `list_contents`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListContentsArguments {
    /// Statute identifier.
    pub law_name: String,
}

/// Arguments of a call to any served tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArguments {
    /// `download_law` arguments.
    Download(DownloadArguments),
    /// `get_paragraph` arguments.
    GetParagraph(GetParagraphArguments),
    /// `list_contents` arguments.
    ListContents(ListContentsArguments),
}

impl ToolArguments {
    /// Deserialises the arguments for `tool`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidParams`] when a required field is
    /// missing, a field has the wrong type, or the arguments are not an
    /// object.
    pub fn parse(tool: ToolName, arguments: Option<Value>) -> Result<Self, ProtocolError> {
        match tool {
            ToolName::DownloadLaw => decode(tool, arguments).map(Self::Download),
            ToolName::GetParagraph => decode(tool, arguments).map(Self::GetParagraph),
            ToolName::ListContents => decode(tool, arguments).map(Self::ListContents),
        }
    }

    /// Validates every field and builds the dispatcher request.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first rejected field.
    pub fn into_request(self) -> Result<OperationRequest, ValidationError> {
        match self {
            Self::Download(arguments) => {
                OperationRequest::download(&arguments.law_name, arguments.force_update)
            }
            Self::GetParagraph(arguments) => OperationRequest::get_paragraph(
                &arguments.paragraph,
                &arguments.law_name,
                arguments.absatz.as_deref(),
            ),
            Self::ListContents(arguments) => OperationRequest::list_contents(&arguments.law_name),
        }
    }
}

fn decode<T>(tool: ToolName, arguments: Option<Value>) -> Result<T, ProtocolError>
where
    T: DeserializeOwned,
{
    let value = match arguments {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(value) => value,
    };
    serde_json::from_value(value)
        .map_err(|error| ProtocolError::invalid_params(format!("{tool}: {error}")))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn download_defaults_force_update_to_false() {
        let arguments =
            ToolArguments::parse(ToolName::DownloadLaw, Some(json!({"law_name": "estg"})))
                .expect("valid arguments");
        assert_eq!(
            arguments,
            ToolArguments::Download(DownloadArguments {
                law_name: "estg".into(),
                force_update: false,
            })
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let arguments = ToolArguments::parse(
            ToolName::ListContents,
            Some(json!({"law_name": "bgb", "verbose": true})),
        )
        .expect("valid arguments");
        let request = arguments.into_request().expect("valid request");
        assert_eq!(request.law().as_str(), "bgb");
    }

    #[rstest]
    #[case::missing_arguments(ToolName::ListContents, None)]
    #[case::null_arguments(ToolName::DownloadLaw, Some(Value::Null))]
    #[case::missing_paragraph(ToolName::GetParagraph, Some(json!({"law_name": "bgb"})))]
    #[case::wrong_type(
        ToolName::DownloadLaw,
        Some(json!({"law_name": "bgb", "force_update": "yes"}))
    )]
    #[case::numeric_law(ToolName::ListContents, Some(json!({"law_name": 5})))]
    #[case::not_an_object(ToolName::ListContents, Some(json!(["bgb"])))]
    fn shape_errors_are_invalid_params(#[case] tool: ToolName, #[case] arguments: Option<Value>) {
        let error = ToolArguments::parse(tool, arguments).expect_err("invalid params");
        assert_eq!(error.code(), -32_602);
        assert!(error.to_string().contains(tool.as_str()));
    }

    #[rstest]
    #[case::null_absatz(json!(null), 2)]
    #[case::empty_absatz(json!(""), 2)]
    #[case::list_absatz(json!("[1,3]"), 3)]
    fn absatz_is_optional(#[case] absatz: Value, #[case] arg_count: usize) {
        let arguments = ToolArguments::parse(
            ToolName::GetParagraph,
            Some(json!({"paragraph": "§ 70", "law_name": "bgb", "absatz": absatz})),
        )
        .expect("valid arguments");
        let request = arguments.into_request().expect("valid request");
        assert_eq!(request.invocation().args().len(), arg_count);
    }

    #[test]
    fn field_validation_runs_after_decoding() {
        let arguments = ToolArguments::parse(
            ToolName::GetParagraph,
            Some(json!({"paragraph": "§ 1", "law_name": "../etc"})),
        )
        .expect("shape is valid");
        let error = arguments.into_request().expect_err("law name rejected");
        assert!(matches!(error, ValidationError::InvalidIdentifier { .. }));
    }

    #[test]
    fn call_params_require_name() {
        let error = CallParams::from_params(&json!({"arguments": {}})).expect_err("no name");
        assert_eq!(error.code(), -32_602);
    }
}
