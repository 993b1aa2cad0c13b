//! Query gateway: validates, executes and projects catalogue operations.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::client::{GraphClient, GraphConfig};
use crate::error::{GraphError, GraphResult};
use crate::queries::coverages::{self, CoverageSummary, CoverageTerm};
use crate::queries::forms::{self, Form, PolicyType, PolicyTypeEntry};
use crate::queries::paragraphs::{self, CcqList, Paragraph, ParagraphQuery, ParagraphSummary};
use crate::queries::Operation;
use crate::store::{GraphStore, Record};

/// Result of the liveness probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub status: String,
    pub message: String,
}

/// Runs catalogue operations against a [`GraphStore`].
///
/// Cheap to clone; every clone shares the same store handle.
#[derive(Clone)]
pub struct QueryGateway {
    store: Arc<dyn GraphStore>,
}

impl QueryGateway {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Build a gateway backed by a Neo4j client.
    pub async fn connect(config: &GraphConfig) -> GraphResult<Self> {
        let client = GraphClient::connect(config).await?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Validate the operation and run its statement.
    async fn rows(&self, op: &Operation) -> GraphResult<Vec<Record>> {
        op.validate()?;
        let statement = op.statement().ok_or_else(|| {
            GraphError::Unexpected(format!("Operation '{}' has no query", op.name()))
        })?;

        let rows = self.store.fetch(&statement).await.inspect_err(|e| {
            error!(operation = op.name(), "Failed to run query: {}", e);
        })?;

        if rows.is_empty() {
            warn!(operation = op.name(), "Query returned no rows");
        } else {
            info!(operation = op.name(), rows = rows.len(), "Query returned rows");
        }
        Ok(rows)
    }

    pub async fn test_connection(&self) -> GraphResult<ConnectionStatus> {
        info!("Testing Neo4j connection...");
        self.store.ping().await.inspect_err(|e| {
            error!("Connection test failed: {}", e);
        })?;

        Ok(ConnectionStatus {
            status: "success".to_string(),
            message: "Successfully connected to Neo4j".to_string(),
        })
    }

    pub async fn list_forms(&self) -> GraphResult<Vec<Form>> {
        info!("Fetching forms");
        forms::project_forms(self.rows(&Operation::ListForms).await?)
    }

    pub async fn list_policy_types(&self) -> GraphResult<Vec<PolicyTypeEntry>> {
        info!("Fetching policy types");
        forms::project_policy_types(self.rows(&Operation::ListPolicyTypes).await?)
    }

    pub async fn list_coverages(&self) -> GraphResult<Vec<Map<String, Value>>> {
        info!("Fetching coverages");
        coverages::project_coverages(self.rows(&Operation::ListCoverages).await?)
    }

    /// Look up the policy type of a single form.
    ///
    /// Fails with [`GraphError::NotFound`] when no form carries `form_number`.
    pub async fn get_policy_type_by_form(&self, form_number: &str) -> GraphResult<PolicyType> {
        info!(form_number, "Fetching policy type for form");
        let op = Operation::PolicyTypeByForm {
            form_number: form_number.to_string(),
        };
        forms::project_policy_type(self.rows(&op).await?, form_number).inspect_err(|e| {
            if matches!(e, GraphError::NotFound(_)) {
                warn!(form_number, "No form found");
            }
        })
    }

    pub async fn list_coverages_by_form(&self, form_number: &str) -> GraphResult<Vec<CoverageSummary>> {
        info!(form_number, "Fetching coverages for form");
        let op = Operation::CoveragesByForm {
            form_number: form_number.to_string(),
        };
        coverages::project_coverages_by_form(self.rows(&op).await?)
    }

    pub async fn list_coverage_terms(
        &self,
        form_number: &str,
        coverage_code: &str,
    ) -> GraphResult<Vec<CoverageTerm>> {
        info!(form_number, coverage_code, "Fetching coverage terms");
        let op = Operation::CoverageTerms {
            form_number: form_number.to_string(),
            coverage_code: coverage_code.to_string(),
        };
        coverages::project_coverage_terms(self.rows(&op).await?)
    }

    pub async fn get_ccq_list(&self, policy_form: &str) -> GraphResult<CcqList> {
        info!(policy_form, "Fetching CCQ term list");
        let op = Operation::CcqList {
            policy_form: policy_form.to_string(),
        };
        paragraphs::project_ccq_list(self.rows(&op).await?)
    }

    pub async fn list_all_paragraphs(&self, policy_form: &str) -> GraphResult<Vec<ParagraphSummary>> {
        info!(policy_form, "Fetching all paragraphs");
        let op = Operation::AllParagraphs {
            policy_form: policy_form.to_string(),
        };
        paragraphs::project_all_paragraphs(self.rows(&op).await?)
    }

    /// Select paragraphs by mapped term, title section or explicit number.
    pub async fn query_paragraphs(&self, query: ParagraphQuery) -> GraphResult<Vec<Paragraph>> {
        info!(
            policy_form = query.form(),
            terms = query.terms.len(),
            selected = query.manually_selected_paragraphs.as_ref().map_or(0, Vec::len),
            "Querying paragraphs"
        );
        let query = query.normalized();
        let rows = self.rows(&Operation::QueryParagraphs(query.clone())).await?;
        paragraphs::project_query_paragraphs(rows, &query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::paragraphs::POLICY_TITLE_SECTION;
    use crate::queries::DEFAULT_POLICY_FORM;
    use crate::store::{Param, Statement};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory store that answers by policy form and counts calls.
    #[derive(Default)]
    struct FakeStore {
        forms: Vec<(String, String)>,
        paragraphs: Vec<Value>,
        down: bool,
        calls: Mutex<usize>,
    }

    fn text_param(statement: &Statement, name: &str) -> String {
        match statement.get_param(name) {
            Some(Param::Text(s)) => s.clone(),
            _ => String::new(),
        }
    }

    #[async_trait]
    impl GraphStore for FakeStore {
        async fn fetch(&self, statement: &Statement) -> GraphResult<Vec<Record>> {
            *self.calls.lock().unwrap() += 1;
            if self.down {
                return Err(GraphError::dependency("connection refused"));
            }

            if statement.columns == ["policy_type"] {
                let wanted = text_param(statement, "form_number");
                return Ok(self
                    .forms
                    .iter()
                    .filter(|(number, _)| *number == wanted)
                    .map(|(_, ty)| json!({"policy_type": ty}).as_object().cloned().unwrap())
                    .collect());
            }

            if statement.columns.contains(&"MappedTerms") {
                let wanted = text_param(statement, "policy_form");
                return Ok(self
                    .paragraphs
                    .iter()
                    .filter(|p| p["form"] == wanted.as_str())
                    .map(|p| {
                        let mut row = p.as_object().cloned().unwrap();
                        row.remove("form");
                        row
                    })
                    .collect());
            }

            Ok(Vec::new())
        }

        async fn ping(&self) -> GraphResult<()> {
            if self.down {
                return Err(GraphError::dependency("connection refused"));
            }
            Ok(())
        }
    }

    fn paragraph(form: &str, number: i64, ty: &str, terms: &[&str]) -> Value {
        json!({
            "form": form,
            "Section": "Section I",
            "Subsection": null,
            "ListItem": null,
            "Type": ty,
            "ParagraphNumber": number,
            "Page": 1,
            "Text": "text",
            "MappedTerms": terms,
        })
    }

    fn gateway(store: FakeStore) -> (QueryGateway, Arc<FakeStore>) {
        let store = Arc::new(store);
        (QueryGateway::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_policy_type_found() {
        let (gw, _) = gateway(FakeStore {
            forms: vec![("HO00030511".to_string(), "Homeowners".to_string())],
            ..Default::default()
        });
        let found = gw.get_policy_type_by_form("HO00030511").await.unwrap();
        assert_eq!(found.policy_type, json!("Homeowners"));
    }

    #[tokio::test]
    async fn test_policy_type_absent_is_not_found() {
        let (gw, _) = gateway(FakeStore::default());
        let err = gw.get_policy_type_by_form("HO00030511").await.unwrap_err();
        assert!(matches!(err, GraphError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_form_number_never_reaches_store() {
        let (gw, store) = gateway(FakeStore::default());
        let err = gw.list_coverages_by_form("").await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidInput(_)));
        assert_eq!(*store.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_result_is_success() {
        let (gw, _) = gateway(FakeStore::default());
        assert!(gw.list_forms().await.unwrap().is_empty());
        assert!(gw.get_ccq_list(DEFAULT_POLICY_FORM).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_down_surfaces_dependency_failure() {
        let (gw, store) = gateway(FakeStore {
            down: true,
            ..Default::default()
        });
        assert!(matches!(
            gw.list_forms().await,
            Err(GraphError::DependencyFailure(_))
        ));
        assert!(matches!(
            gw.test_connection().await,
            Err(GraphError::DependencyFailure(_))
        ));
        // One attempt, no retry.
        assert_eq!(*store.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_connection_check_reports_success() {
        let (gw, store) = gateway(FakeStore::default());
        let status = gw.test_connection().await.unwrap();
        assert_eq!(status.status, "success");
        assert_eq!(*store.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_paragraphs_scoped_to_form() {
        let (gw, _) = gateway(FakeStore {
            paragraphs: vec![
                paragraph(DEFAULT_POLICY_FORM, 2, "Paragraph", &["Flood"]),
                paragraph(DEFAULT_POLICY_FORM, 1, POLICY_TITLE_SECTION, &[]),
                paragraph("HO00050511", 1, POLICY_TITLE_SECTION, &[]),
                paragraph(DEFAULT_POLICY_FORM, 5, "Paragraph", &["Theft"]),
            ],
            ..Default::default()
        });

        let query = ParagraphQuery::new(None, vec!["Flood".to_string()]);
        let paragraphs = gw.query_paragraphs(query).await.unwrap();
        let numbers: Vec<_> = paragraphs.iter().filter_map(|p| p.paragraph_number.as_i64()).collect();
        assert_eq!(numbers, vec![1, 2]);

        let title_only = gw
            .query_paragraphs(ParagraphQuery::new(Some("HO00050511"), Vec::new()))
            .await
            .unwrap();
        assert_eq!(title_only.len(), 1);
        assert_eq!(title_only[0].paragraph_type.as_deref(), Some(POLICY_TITLE_SECTION));
    }
}
