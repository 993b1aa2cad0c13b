//! The fixed catalogue of read operations.
//!
//! Every operation the API exposes is a variant of [`Operation`]. A variant
//! knows how to validate its inputs and which constant Cypher statement it
//! runs; the sibling modules hold the statements, the row models and the
//! projections that turn raw rows into those models.

pub mod coverages;
pub mod forms;
pub mod paragraphs;

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{GraphError, GraphResult};
use crate::store::{Record, Statement};

pub use paragraphs::ParagraphQuery;

/// Policy form used when a caller does not name one.
pub const DEFAULT_POLICY_FORM: &str = "HO00030511";

/// A named gateway operation with its inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    TestConnection,
    ListForms,
    ListPolicyTypes,
    ListCoverages,
    PolicyTypeByForm { form_number: String },
    CoveragesByForm { form_number: String },
    CoverageTerms { form_number: String, coverage_code: String },
    CcqList { policy_form: String },
    AllParagraphs { policy_form: String },
    QueryParagraphs(ParagraphQuery),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TestConnection => "test_connection",
            Self::ListForms => "list_forms",
            Self::ListPolicyTypes => "list_policy_types",
            Self::ListCoverages => "list_coverages",
            Self::PolicyTypeByForm { .. } => "get_policy_type_by_form",
            Self::CoveragesByForm { .. } => "list_coverages_by_form",
            Self::CoverageTerms { .. } => "list_coverage_terms",
            Self::CcqList { .. } => "get_ccq_list",
            Self::AllParagraphs { .. } => "list_all_paragraphs",
            Self::QueryParagraphs(_) => "query_paragraphs",
        }
    }

    /// Check required parameters before anything reaches the store.
    pub fn validate(&self) -> GraphResult<()> {
        match self {
            Self::PolicyTypeByForm { form_number } | Self::CoveragesByForm { form_number } => {
                require("form_number", form_number)
            }
            Self::CoverageTerms {
                form_number,
                coverage_code,
            } => {
                require("form_number", form_number)?;
                require("coverage_code", coverage_code)
            }
            Self::CcqList { policy_form } | Self::AllParagraphs { policy_form } => {
                require("policy_form", policy_form)
            }
            Self::QueryParagraphs(query) => require("policy_form", query.form()),
            Self::TestConnection
            | Self::ListForms
            | Self::ListPolicyTypes
            | Self::ListCoverages => Ok(()),
        }
    }

    /// The bound statement this operation runs, or `None` for the liveness
    /// probe which issues no data query.
    pub fn statement(&self) -> Option<Statement> {
        let statement = match self {
            Self::TestConnection => return None,
            Self::ListForms => forms::list_forms_statement(),
            Self::ListPolicyTypes => forms::list_policy_types_statement(),
            Self::ListCoverages => coverages::list_coverages_statement(),
            Self::PolicyTypeByForm { form_number } => forms::policy_type_by_form_statement(form_number),
            Self::CoveragesByForm { form_number } => coverages::coverages_by_form_statement(form_number),
            Self::CoverageTerms {
                form_number,
                coverage_code,
            } => coverages::coverage_terms_statement(form_number, coverage_code),
            Self::CcqList { policy_form } => paragraphs::ccq_list_statement(policy_form),
            Self::AllParagraphs { policy_form } => paragraphs::all_paragraphs_statement(policy_form),
            Self::QueryParagraphs(query) => paragraphs::query_paragraphs_statement(query),
        };
        Some(statement)
    }
}

/// Resolve an optional policy form, falling back to the default when it is
/// missing or blank.
pub fn resolve_policy_form(policy_form: Option<&str>) -> String {
    match policy_form.map(str::trim) {
        Some(form) if !form.is_empty() => form.to_string(),
        _ => DEFAULT_POLICY_FORM.to_string(),
    }
}

fn require(name: &str, value: &str) -> GraphResult<()> {
    if value.trim().is_empty() {
        return Err(GraphError::invalid_input(format!(
            "'{}' is required and must not be empty",
            name
        )));
    }
    Ok(())
}

/// Compare optional values the way Cypher `ORDER BY` does, with nulls last.
pub(crate) fn cmp_nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Decode every row into `T`.
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Record>) -> GraphResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(GraphError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Param;

    #[test]
    fn test_blank_form_number_is_rejected() {
        let op = Operation::PolicyTypeByForm {
            form_number: "   ".to_string(),
        };
        assert!(matches!(op.validate(), Err(GraphError::InvalidInput(_))));
    }

    #[test]
    fn test_coverage_terms_requires_both_parameters() {
        let op = Operation::CoverageTerms {
            form_number: "HO00030511".to_string(),
            coverage_code: String::new(),
        };
        let err = op.validate().unwrap_err();
        assert!(err.to_string().contains("coverage_code"));
    }

    #[test]
    fn test_parameterless_operations_validate() {
        assert!(Operation::ListForms.validate().is_ok());
        assert!(Operation::TestConnection.validate().is_ok());
    }

    #[test]
    fn test_connection_check_has_no_statement() {
        assert!(Operation::TestConnection.statement().is_none());
    }

    #[test]
    fn test_parameters_are_bound_not_interpolated() {
        let hostile = "x' OR 1=1 //";
        let op = Operation::PolicyTypeByForm {
            form_number: hostile.to_string(),
        };
        let statement = op.statement().unwrap();
        assert!(!statement.cypher.contains(hostile));
        assert_eq!(
            statement.get_param("form_number"),
            Some(&Param::Text(hostile.to_string()))
        );
    }

    #[test]
    fn test_resolve_policy_form_defaults() {
        assert_eq!(resolve_policy_form(None), DEFAULT_POLICY_FORM);
        assert_eq!(resolve_policy_form(Some("")), DEFAULT_POLICY_FORM);
        assert_eq!(resolve_policy_form(Some("HO00050511")), "HO00050511");
    }

    #[test]
    fn test_nulls_sort_last() {
        let mut codes = vec![None, Some("B"), Some("A"), None];
        codes.sort_by(cmp_nulls_last);
        assert_eq!(codes, vec![Some("A"), Some("B"), None, None]);
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::ListForms.name(), "list_forms");
        assert_eq!(
            Operation::CcqList {
                policy_form: DEFAULT_POLICY_FORM.to_string()
            }
            .name(),
            "get_ccq_list"
        );
    }
}
