//! Validated operation requests.
//!
//! An [`OperationRequest`] can only be built through constructors that run the
//! field validators, so holding one is proof that every field is safe to hand
//! to an external tool. Requests are consumed once by the dispatcher and never
//! retained.

use std::fmt;

use crate::error::ValidationError;
use crate::invocation::{FORCE_UPDATE_FLAG, ToolInvocation, ToolKind};
use crate::validate::{
    LawIdentifier, ProvisionLocator, SubsectionLocator, validate_law_identifier,
    validate_provision, validate_subsection,
};

/// Operation names accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Fetch a statute document.
    Download,
    /// Extract a provision.
    GetParagraph,
    /// List a statute's table of contents.
    ListContents,
}

impl Operation {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::GetParagraph => "get_paragraph",
            Self::ListContents => "list_contents",
        }
    }

    /// Tool that implements this operation.
    #[must_use]
    pub const fn tool(self) -> ToolKind {
        match self {
            Self::Download => ToolKind::Downloader,
            Self::GetParagraph => ToolKind::ParagraphExtractor,
            Self::ListContents => ToolKind::TableOfContents,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated request for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    /// Fetch a statute document, optionally replacing a local copy.
    Download {
        /// Statute to fetch.
        law: LawIdentifier,
        /// Replace an existing local document.
        force_refresh: bool,
    },
    /// Extract a provision, optionally narrowed to subsections.
    GetParagraph {
        /// Provision to extract.
        provision: ProvisionLocator,
        /// Statute containing the provision.
        law: LawIdentifier,
        /// Subsections to keep; `None` extracts the whole provision.
        subsection: Option<SubsectionLocator>,
    },
    /// List a statute's provisions.
    ListContents {
        /// Statute to list.
        law: LawIdentifier,
    },
}

impl OperationRequest {
    /// Validates the fields of a download request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentifier`] if `law` is rejected.
    pub fn download(law: &str, force_refresh: bool) -> Result<Self, ValidationError> {
        Ok(Self::Download {
            law: validate_law_identifier(law)?,
            force_refresh,
        })
    }

    /// Validates the fields of a provision extraction request.
    ///
    /// Fields are checked in argument order; the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first rejected field.
    pub fn get_paragraph(
        provision: &str,
        law: &str,
        subsection: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::GetParagraph {
            provision: validate_provision(provision)?,
            law: validate_law_identifier(law)?,
            subsection: validate_subsection(subsection)?,
        })
    }

    /// Validates the fields of a table-of-contents request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentifier`] if `law` is rejected.
    pub fn list_contents(law: &str) -> Result<Self, ValidationError> {
        Ok(Self::ListContents {
            law: validate_law_identifier(law)?,
        })
    }

    /// Operation this request performs.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Download { .. } => Operation::Download,
            Self::GetParagraph { .. } => Operation::GetParagraph,
            Self::ListContents { .. } => Operation::ListContents,
        }
    }

    /// Statute the request targets.
    #[must_use]
    pub const fn law(&self) -> &LawIdentifier {
        match self {
            Self::Download { law, .. }
            | Self::GetParagraph { law, .. }
            | Self::ListContents { law } => law,
        }
    }

    /// Builds the tool invocation for this request.
    ///
    /// - download: `[--force-update] <law>`
    /// - get_paragraph: `<provision> <law> [<subsection>]`
    /// - list_contents: `<law>`
    #[must_use]
    pub fn invocation(&self) -> ToolInvocation {
        let args = match self {
            Self::Download { law, force_refresh } => {
                let mut args = Vec::with_capacity(2);
                if *force_refresh {
                    args.push(FORCE_UPDATE_FLAG.to_owned());
                }
                args.push(law.as_str().to_owned());
                args
            }
            Self::GetParagraph {
                provision,
                law,
                subsection,
            } => {
                let mut args = vec![provision.as_str().to_owned(), law.as_str().to_owned()];
                if let Some(subsection) = subsection {
                    args.push(subsection.as_str().to_owned());
                }
                args
            }
            Self::ListContents { law } => vec![law.as_str().to_owned()],
        };
        ToolInvocation::new(self.operation().tool(), args)
    }
}
