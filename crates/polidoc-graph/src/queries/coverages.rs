//! Coverage queries.
//!
//! Coverages are reached from a form through its paragraphs:
//! `(Paragraph)-[:Related_Coverage]-(Coverage)`, and their terms through
//! `(Map_Term)-[:Maps_To]-(Paragraph)`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GraphResult;
use crate::store::{Record, Statement};

use super::{cmp_nulls_last, decode_rows};

/// Paragraph types that only carry headings and never map terms.
pub const TITLE_PARAGRAPH_TYPES: &[&str] = &["Section Title", "Subsection Title"];

/// Map type used in the graph for "no mapping".
pub const UNMAPPED_MAP_TYPE: &str = "None";

const LIST_COVERAGES: &str = "MATCH (n:Coverage)
     RETURN properties(n) AS coverage
     LIMIT 25";

const COVERAGES_BY_FORM: &str = "MATCH (p:Paragraph)-[:Related_Coverage]-(c:Coverage)
     WHERE p.Policy_Form = $form_number
     RETURN DISTINCT c.Coverage AS coverage_code, c.Cov_For AS coverage_name
     ORDER BY coverage_code";

const COVERAGE_TERMS: &str = "MATCH (m:Map_Term)-[x:Maps_To]-(p:Paragraph)-[:Related_Coverage]-(c:Coverage)
     WHERE p.Policy_Form = $form_number
       AND c.Coverage = $coverage_code
       AND x.Map_Type <> 'None'
       AND NOT coalesce(p.Type, '') IN ['Section Title', 'Subsection Title']
     RETURN DISTINCT c.Coverage AS coverage_code,
                     x.Map_Type AS map_type,
                     m.Term AS term,
                     p.Type AS paragraph_type
     ORDER BY coverage_code, map_type, term";

/// A coverage linked to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub coverage_code: Option<String>,
    pub coverage_name: Option<String>,
}

/// A term mapped to a coverage within a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTerm {
    pub coverage_code: String,
    pub map_type: String,
    pub term: Option<String>,
    #[serde(default, skip_serializing)]
    pub paragraph_type: Option<String>,
}

pub(crate) fn list_coverages_statement() -> Statement {
    Statement::new(LIST_COVERAGES, &["coverage"])
}

pub(crate) fn coverages_by_form_statement(form_number: &str) -> Statement {
    Statement::new(COVERAGES_BY_FORM, &["coverage_code", "coverage_name"])
        .param("form_number", form_number)
}

pub(crate) fn coverage_terms_statement(form_number: &str, coverage_code: &str) -> Statement {
    Statement::new(
        COVERAGE_TERMS,
        &["coverage_code", "map_type", "term", "paragraph_type"],
    )
    .param("form_number", form_number)
    .param("coverage_code", coverage_code)
}

#[derive(Deserialize)]
struct CoverageRow {
    coverage: Map<String, Value>,
}

/// Full attribute maps of every coverage node.
pub(crate) fn project_coverages(rows: Vec<Record>) -> GraphResult<Vec<Map<String, Value>>> {
    let rows: Vec<CoverageRow> = decode_rows(rows)?;
    Ok(rows.into_iter().map(|r| r.coverage).collect())
}

pub(crate) fn project_coverages_by_form(rows: Vec<Record>) -> GraphResult<Vec<CoverageSummary>> {
    let mut coverages: Vec<CoverageSummary> = decode_rows(rows)?;
    coverages.sort_by(|a, b| {
        cmp_nulls_last(&a.coverage_code, &b.coverage_code)
            .then_with(|| cmp_nulls_last(&a.coverage_name, &b.coverage_name))
    });
    coverages.dedup();
    Ok(coverages)
}

pub(crate) fn project_coverage_terms(rows: Vec<Record>) -> GraphResult<Vec<CoverageTerm>> {
    let mut terms: Vec<CoverageTerm> = decode_rows::<CoverageTerm>(rows)?
        .into_iter()
        .filter(|t| t.map_type != UNMAPPED_MAP_TYPE)
        .filter(|t| {
            t.paragraph_type
                .as_deref()
                .is_none_or(|ty| !TITLE_PARAGRAPH_TYPES.contains(&ty))
        })
        .map(|t| CoverageTerm {
            paragraph_type: None,
            ..t
        })
        .collect();
    terms.sort_by(|a, b| {
        a.coverage_code
            .cmp(&b.coverage_code)
            .then_with(|| a.map_type.cmp(&b.map_type))
            .then_with(|| cmp_nulls_last(&a.term, &b.term))
    });
    terms.dedup();
    Ok(terms)
}
