//! Argument-vector construction for the external statute tools.
//!
//! Each validated [`OperationRequest`](crate::OperationRequest) maps to exactly
//! one [`ToolInvocation`]: a tool and the positional arguments to pass it.
//! Arguments are kept as discrete entries and handed to the process API
//! directly, never joined into a shell command line.

use std::fmt;

use serde::Serialize;

/// Flag that asks the downloader to replace an existing local document.
pub const FORCE_UPDATE_FLAG: &str = "--force-update";

/// External executable that performs the work for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Fetches a statute document into the document store.
    Downloader,
    /// Extracts one provision, optionally narrowed to subsections.
    ParagraphExtractor,
    /// Lists every provision identifier and title in document order.
    TableOfContents,
}

impl ToolKind {
    /// File name of the executable inside the tools directory.
    #[must_use]
    pub const fn executable_name(self) -> &'static str {
        match self {
            Self::Downloader => "law-xml-downloader.sh",
            Self::ParagraphExtractor => "get-para.sh",
            Self::TableOfContents => "table-of-contents.sh",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable_name())
    }
}

/// A single planned process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    tool: ToolKind,
    args: Vec<String>,
}

impl ToolInvocation {
    /// Creates an invocation of `tool` with the given positional arguments.
    #[must_use]
    pub const fn new(tool: ToolKind, args: Vec<String>) -> Self {
        Self { tool, args }
    }

    /// Tool to run.
    #[must_use]
    pub const fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Arguments in the order they are passed.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}
