//! Form and policy type queries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GraphError, GraphResult};
use crate::store::{Record, Statement};

use super::decode_rows;

const LIST_FORMS: &str = "MATCH (n:Form)
     RETURN n.State AS State,
            n.Form_Type AS Form_Type,
            n.Form_Name AS Form_Name,
            n.Form_Number AS Form_Number";

// Each branch of the union is capped on its own.
const LIST_POLICY_TYPES: &str = "MATCH (n)
     WHERE n.Policy_Type IS NOT NULL
     RETURN DISTINCT 'node' AS entity, n.Policy_Type AS policy_type
     LIMIT 25
     UNION ALL
     MATCH ()-[r]-()
     WHERE r.Policy_Type IS NOT NULL
     RETURN DISTINCT 'relationship' AS entity, r.Policy_Type AS policy_type
     LIMIT 25";

const POLICY_TYPE_BY_FORM: &str = "MATCH (f:Form)
     WHERE f.Form_Number = $form_number
     RETURN f.Form_Type AS policy_type
     LIMIT 1";

/// A policy form document. Attributes are passed through as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    #[serde(rename = "State", default)]
    pub state: Value,
    #[serde(rename = "Form_Type", default)]
    pub form_type: Value,
    #[serde(rename = "Form_Name", default)]
    pub form_name: Value,
    #[serde(rename = "Form_Number", default)]
    pub form_number: Value,
}

/// Where a `Policy_Type` attribute was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyTypeEntry {
    pub entity: String,
    #[serde(default)]
    pub policy_type: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyType {
    #[serde(default)]
    pub policy_type: Value,
}

pub(crate) fn list_forms_statement() -> Statement {
    Statement::new(LIST_FORMS, &["State", "Form_Type", "Form_Name", "Form_Number"])
}

pub(crate) fn list_policy_types_statement() -> Statement {
    Statement::new(LIST_POLICY_TYPES, &["entity", "policy_type"])
}

pub(crate) fn policy_type_by_form_statement(form_number: &str) -> Statement {
    Statement::new(POLICY_TYPE_BY_FORM, &["policy_type"]).param("form_number", form_number)
}

pub(crate) fn project_forms(rows: Vec<Record>) -> GraphResult<Vec<Form>> {
    decode_rows(rows)
}

pub(crate) fn project_policy_types(rows: Vec<Record>) -> GraphResult<Vec<PolicyTypeEntry>> {
    let entries: Vec<PolicyTypeEntry> = decode_rows(rows)?;
    Ok(entries
        .into_iter()
        .filter(|e| e.entity == "node" || e.entity == "relationship")
        .collect())
}

/// Exactly one form is promised per form number, so no rows is a miss.
pub(crate) fn project_policy_type(rows: Vec<Record>, form_number: &str) -> GraphResult<PolicyType> {
    decode_rows::<PolicyType>(rows)?
        .into_iter()
        .next()
        .ok_or_else(|| GraphError::not_found(format!("Form not found with form number: {}", form_number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_project_policy_type_found() {
        let rows = vec![record(json!({"policy_type": "Homeowners"}))];
        let found = project_policy_type(rows, "HO00030511").unwrap();
        assert_eq!(found.policy_type, json!("Homeowners"));
    }

    #[test]
    fn test_project_policy_type_missing_is_not_found() {
        let err = project_policy_type(Vec::new(), "NOPE").unwrap_err();
        assert!(matches!(err, GraphError::NotFound(_)));
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn test_project_policy_types_keeps_both_entities() {
        let rows = vec![
            record(json!({"entity": "node", "policy_type": "HO-3"})),
            record(json!({"entity": "relationship", "policy_type": "HO-5"})),
        ];
        let entries = project_policy_types(rows).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].entity, "relationship");
        assert_eq!(entries[1].policy_type, json!("HO-5"));
    }

    #[test]
    fn test_project_forms_keeps_attribute_names() {
        let rows = vec![record(json!({
            "State": "TX",
            "Form_Type": "Homeowners",
            "Form_Name": "Special Form",
            "Form_Number": "HO00030511"
        }))];
        let forms = project_forms(rows).unwrap();
        let out = serde_json::to_value(&forms[0]).unwrap();
        assert_eq!(out["Form_Number"], "HO00030511");
        assert_eq!(out["State"], "TX");
    }

    #[test]
    fn test_project_forms_tolerates_missing_attributes() {
        let rows = vec![record(json!({
            "State": null,
            "Form_Type": null,
            "Form_Name": "Unnamed",
            "Form_Number": "X1"
        }))];
        let forms = project_forms(rows).unwrap();
        assert_eq!(forms[0].state, Value::Null);
    }

    #[test]
    fn test_non_string_attributes_pass_through() {
        let rows = vec![record(json!({
            "State": "TX",
            "Form_Type": "Homeowners",
            "Form_Name": "Special Form",
            "Form_Number": 30511
        }))];
        let forms = project_forms(rows).unwrap();
        assert_eq!(serde_json::to_value(&forms[0]).unwrap()["Form_Number"], 30511);

        let entries = project_policy_types(vec![record(json!({"entity": "node", "policy_type": 3}))]).unwrap();
        assert_eq!(entries[0].policy_type, json!(3));
    }
}
