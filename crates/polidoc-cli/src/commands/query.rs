//! Run gateway operations from the terminal.

use anyhow::{Context, Result};
use polidoc_graph::{resolve_policy_form, GraphConfig, QueryGateway};
use serde::Serialize;

use crate::output;

async fn gateway(config: &GraphConfig) -> Result<QueryGateway> {
    QueryGateway::connect(config)
        .await
        .context("Failed to connect to Neo4j")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn forms(config: &GraphConfig, json: bool) -> Result<()> {
    let forms = gateway(config).await?.list_forms().await?;
    if json {
        return print_json(&forms);
    }
    output::print_forms_table(&forms);
    Ok(())
}

pub async fn coverages(config: &GraphConfig, form_number: &str, json: bool) -> Result<()> {
    let coverages = gateway(config)
        .await?
        .list_coverages_by_form(form_number)
        .await?;
    if json {
        return print_json(&coverages);
    }
    output::print_coverages_table(form_number, &coverages);
    Ok(())
}

pub async fn terms(config: &GraphConfig, form_number: &str, coverage_code: &str, json: bool) -> Result<()> {
    let terms = gateway(config)
        .await?
        .list_coverage_terms(form_number, coverage_code)
        .await?;
    if json {
        return print_json(&terms);
    }
    output::print_terms_table(&terms);
    Ok(())
}

pub async fn ccq(config: &GraphConfig, policy_form: Option<&str>, json: bool) -> Result<()> {
    let policy_form = resolve_policy_form(policy_form);
    let ccq = gateway(config).await?.get_ccq_list(&policy_form).await?;
    if json {
        return print_json(&ccq);
    }
    output::print_ccq(&policy_form, &ccq);
    Ok(())
}
