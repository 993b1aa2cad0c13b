//! Paragraph queries: full dumps, term-driven selection and the CCQ term list.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphResult;
use crate::store::{Record, Statement};

use super::{decode_rows, DEFAULT_POLICY_FORM};

/// Map types that feed the claims/coverage questionnaire.
pub const CCQ_MAP_TYPES: &[&str] = &[
    "Non-Covered Peril",
    "Limit of Liability",
    "Property Not Covered",
];

/// Paragraphs of this type are always part of a query result.
pub const POLICY_TITLE_SECTION: &str = "Policy Title Section";

const CCQ_LIST: &str = "MATCH (m:Map_Term)-[x:Maps_To]-(p:Paragraph)
     WHERE p.Policy_Form = $policy_form
       AND x.Map_Type IN $map_types
     RETURN x.Map_Type AS map_type, m.Term AS term
     ORDER BY map_type, term";

const ALL_PARAGRAPHS: &str = "MATCH (p:Paragraph)
     WHERE p.Policy_Form = $policy_form
     RETURN p.Paragraph_Number AS ParagraphNumber,
            p.Section AS Section,
            p.Subsection AS Subsection,
            p.Text AS Text,
            p.Page AS Page
     ORDER BY ParagraphNumber";

// Pattern comprehension keeps this valid on Neo4j 4.x as well as 5.x.
const QUERY_PARAGRAPHS: &str = "MATCH (p:Paragraph)
     WHERE p.Policy_Form = $policy_form
     WITH p, [(p)-[:Maps_To]->(m:Map_Term) | m.Term] AS mapped_terms
     WHERE any(t IN mapped_terms WHERE t IN $terms)
        OR p.Type = 'Policy Title Section'
        OR toString(p.Paragraph_Number) IN $selected_paragraphs
     RETURN DISTINCT p.Section AS Section,
                     p.Subsection AS Subsection,
                     p.List_Item AS ListItem,
                     p.Type AS Type,
                     p.Paragraph_Number AS ParagraphNumber,
                     p.Page AS Page,
                     p.Text AS Text,
                     mapped_terms AS MappedTerms
     ORDER BY ParagraphNumber";

/// Input of a paragraph query.
///
/// A missing, null or blank `policy_form` targets [`DEFAULT_POLICY_FORM`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphQuery {
    #[serde(default)]
    pub policy_form: Option<String>,
    pub terms: Vec<String>,
    #[serde(default)]
    pub manually_selected_paragraphs: Option<Vec<i64>>,
}

impl ParagraphQuery {
    pub fn new(policy_form: Option<&str>, terms: Vec<String>) -> Self {
        Self {
            policy_form: policy_form.map(str::to_string),
            terms,
            manually_selected_paragraphs: None,
        }
    }

    /// The policy form this query runs against.
    pub fn form(&self) -> &str {
        match self.policy_form.as_deref().map(str::trim) {
            Some(form) if !form.is_empty() => form,
            _ => DEFAULT_POLICY_FORM,
        }
    }

    pub fn with_selected(mut self, paragraphs: Vec<i64>) -> Self {
        self.manually_selected_paragraphs = Some(paragraphs);
        self
    }

    /// Pin the policy form, falling back to the default.
    pub fn normalized(self) -> Self {
        Self {
            policy_form: Some(self.form().to_string()),
            ..self
        }
    }

    /// Paragraph numbers are compared as strings on both sides.
    fn selected_as_strings(&self) -> Vec<String> {
        self.manually_selected_paragraphs
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|n| n.to_string())
            .collect()
    }
}

/// One row of a full paragraph dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphSummary {
    #[serde(rename = "ParagraphNumber", default)]
    pub paragraph_number: Value,
    #[serde(rename = "Section")]
    pub section: Option<String>,
    #[serde(rename = "Subsection")]
    pub subsection: Option<String>,
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(rename = "Page", default)]
    pub page: Value,
}

/// A paragraph selected by a term query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(rename = "Section")]
    pub section: Option<String>,
    #[serde(rename = "Subsection")]
    pub subsection: Option<String>,
    #[serde(rename = "ListItem", default)]
    pub list_item: Value,
    #[serde(rename = "Type")]
    pub paragraph_type: Option<String>,
    #[serde(rename = "ParagraphNumber", default)]
    pub paragraph_number: Value,
    #[serde(rename = "Page", default)]
    pub page: Value,
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(rename = "MappedTerms", default, skip_serializing)]
    pub mapped_terms: Vec<Option<String>>,
}

/// Terms grouped by map type, each group sorted by term text.
pub type CcqList = BTreeMap<String, Vec<String>>;

pub(crate) fn ccq_list_statement(policy_form: &str) -> Statement {
    Statement::new(CCQ_LIST, &["map_type", "term"])
        .param("policy_form", policy_form)
        .param_list(
            "map_types",
            CCQ_MAP_TYPES.iter().map(|t| t.to_string()).collect(),
        )
}

pub(crate) fn all_paragraphs_statement(policy_form: &str) -> Statement {
    Statement::new(
        ALL_PARAGRAPHS,
        &["ParagraphNumber", "Section", "Subsection", "Text", "Page"],
    )
    .param("policy_form", policy_form)
}

pub(crate) fn query_paragraphs_statement(query: &ParagraphQuery) -> Statement {
    Statement::new(
        QUERY_PARAGRAPHS,
        &[
            "Section",
            "Subsection",
            "ListItem",
            "Type",
            "ParagraphNumber",
            "Page",
            "Text",
            "MappedTerms",
        ],
    )
    .param("policy_form", query.form())
    .param_list("terms", query.terms.clone())
    .param_list("selected_paragraphs", query.selected_as_strings())
}

#[derive(Deserialize)]
struct CcqRow {
    map_type: Option<String>,
    term: Option<String>,
}

/// Group CCQ rows by map type. Duplicate terms coming from different
/// paragraphs are kept.
pub(crate) fn project_ccq_list(rows: Vec<Record>) -> GraphResult<CcqList> {
    let mut grouped = CcqList::new();
    for row in decode_rows::<CcqRow>(rows)? {
        let (Some(map_type), Some(term)) = (row.map_type, row.term) else {
            continue;
        };
        if !CCQ_MAP_TYPES.contains(&map_type.as_str()) {
            continue;
        }
        grouped.entry(map_type).or_default().push(term);
    }
    for terms in grouped.values_mut() {
        terms.sort();
    }
    Ok(grouped)
}

/// `toString(p.Paragraph_Number)` as Cypher would render it. The stored
/// attribute is not always an integer.
fn number_text(number: &Value) -> Option<String> {
    match number {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Cypher `ORDER BY` over mixed values: strings, then booleans, then
/// numbers, with nulls last.
fn cmp_paragraph_numbers(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Object(_) => 0,
            Value::Array(_) => 1,
            Value::String(_) => 2,
            Value::Bool(_) => 3,
            Value::Number(_) => 4,
            Value::Null => 5,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

pub(crate) fn project_all_paragraphs(rows: Vec<Record>) -> GraphResult<Vec<ParagraphSummary>> {
    let mut paragraphs: Vec<ParagraphSummary> = decode_rows(rows)?;
    paragraphs.sort_by(|a, b| cmp_paragraph_numbers(&a.paragraph_number, &b.paragraph_number));
    Ok(paragraphs)
}

/// Keep rows matched by any of the three selection clauses, ordered by
/// paragraph number with exact duplicates removed.
pub(crate) fn project_query_paragraphs(
    rows: Vec<Record>,
    query: &ParagraphQuery,
) -> GraphResult<Vec<Paragraph>> {
    let terms: BTreeSet<&str> = query.terms.iter().map(String::as_str).collect();
    let selected: BTreeSet<String> = query.selected_as_strings().into_iter().collect();

    let mut paragraphs: Vec<Paragraph> = decode_rows::<Paragraph>(rows)?
        .into_iter()
        .filter(|p| {
            let term_match = p
                .mapped_terms
                .iter()
                .flatten()
                .any(|t| terms.contains(t.as_str()));
            let title_match = p.paragraph_type.as_deref() == Some(POLICY_TITLE_SECTION);
            let manual_match =
                number_text(&p.paragraph_number).is_some_and(|n| selected.contains(&n));
            term_match || title_match || manual_match
        })
        .collect();

    paragraphs.sort_by(|a, b| cmp_paragraph_numbers(&a.paragraph_number, &b.paragraph_number));
    paragraphs.dedup();
    Ok(paragraphs)
}
