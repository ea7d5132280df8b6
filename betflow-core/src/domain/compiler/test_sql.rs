// betflow-core/src/domain/compiler/test_sql.rs
//
// Turns a column test into a query returning the number of failing rows.
// A test passes when that number is zero.

use serde::Serialize;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::Token;
use std::collections::HashSet;

use crate::domain::error::DomainError;
use crate::domain::ports::TemplateEngine;
use crate::domain::project::Manifest;
use crate::domain::quality::{Bound, ContractCheck, DataTest, Severity, Sport, TestKind};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CompiledTest {
    pub unique_id: String,
    pub model: String,
    pub column: String,
    pub test_name: String,
    pub severity: Severity,
    pub sql: String,
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Compiles every enabled test of the manifest, in declaration order.
pub fn compile_manifest(
    manifest: &Manifest,
    renderer: &dyn TemplateEngine,
) -> Result<Vec<CompiledTest>, DomainError> {
    compile_all(
        manifest
            .tests()
            .map(|(m, c, t)| (m.name.as_str(), c.name.as_str(), t)),
        renderer,
    )
}

/// Compiles the documented tests followed by the feed contract checks, with
/// ids unique across both.
pub fn compile_with_contract(
    manifest: &Manifest,
    contract: &[ContractCheck],
    renderer: &dyn TemplateEngine,
) -> Result<Vec<CompiledTest>, DomainError> {
    let documented = manifest
        .tests()
        .map(|(m, c, t)| (m.name.as_str(), c.name.as_str(), t));
    let derived = contract
        .iter()
        .map(|check| (check.model.as_str(), check.column.as_str(), &check.test));
    compile_all(documented.chain(derived), renderer)
}

fn compile_all<'a>(
    tests: impl Iterator<Item = (&'a str, &'a str, &'a DataTest)>,
    renderer: &dyn TemplateEngine,
) -> Result<Vec<CompiledTest>, DomainError> {
    let mut compiled = Vec::new();
    let mut ids = UniqueIds::default();

    for (model, column, test) in tests {
        if !test.enabled {
            tracing::debug!(model = %model, column = %column, test = %test.name, "Skipping disabled test");
            continue;
        }

        let mut node = compile_test(model, column, test, renderer)?;
        node.unique_id = ids.issue(&node.unique_id);
        compiled.push(node);
    }

    Ok(compiled)
}

/// Hands out ids, suffixing `_2`, `_3`... until the candidate is free.
#[derive(Default)]
struct UniqueIds {
    issued: HashSet<String>,
}

impl UniqueIds {
    fn issue(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 1;
        while self.issued.contains(&candidate) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        self.issued.insert(candidate.clone());
        candidate
    }
}

pub fn compile_test(
    model: &str,
    column: &str,
    test: &DataTest,
    renderer: &dyn TemplateEngine,
) -> Result<CompiledTest, DomainError> {
    let inner = failing_rows_sql(model, column, test, renderer)?;

    Ok(CompiledTest {
        unique_id: format!("{}_{}_{}", test.short_name(), model, column),
        model: model.to_string(),
        column: column.to_string(),
        test_name: test.name.clone(),
        severity: test.severity,
        sql: format!(
            "SELECT COUNT(*) AS failures FROM ({}) AS test_failures",
            inner
        ),
    })
}

fn failing_rows_sql(
    model: &str,
    column: &str,
    test: &DataTest,
    renderer: &dyn TemplateEngine,
) -> Result<String, DomainError> {
    let table = quote_identifier(model);
    let col = quote_identifier(column);

    let sql = match &test.kind {
        TestKind::NotNull => format!("SELECT {col} FROM {table} WHERE {col} IS NULL"),

        TestKind::Unique => format!(
            "SELECT {col} FROM {table} WHERE {col} IS NOT NULL GROUP BY {col} HAVING COUNT(*) > 1"
        ),

        TestKind::AcceptedValues { values, quote } => {
            let list = values
                .iter()
                .map(|v| -> Result<String, DomainError> {
                    if *quote {
                        return Ok(quote_literal(v));
                    }
                    validate_expression(v).map_err(|reason| DomainError::InvalidValue {
                        test: test.name.clone(),
                        value: v.clone(),
                        reason,
                    })?;
                    Ok(v.clone())
                })
                .collect::<Result<Vec<_>, DomainError>>()?
                .join(", ");
            format!("SELECT {col} FROM {table} WHERE {col} IS NOT NULL AND {col} NOT IN ({list})")
        }

        TestKind::Relationships { to, field } => {
            let parent = quote_identifier(to);
            let field = quote_identifier(field);
            format!(
                "SELECT child.{col} FROM {table} AS child LEFT JOIN {parent} AS parent \
                 ON child.{col} = parent.{field} \
                 WHERE child.{col} IS NOT NULL AND parent.{field} IS NULL"
            )
        }

        TestKind::ExpectBetween {
            min_value,
            max_value,
            strictly,
        } => {
            let (lower, upper) = if *strictly { (">", "<") } else { (">=", "<=") };
            let mut conditions = Vec::new();
            if let Some(bound) = min_value {
                let expr = render_bound(bound, &test.name, renderer)?;
                conditions.push(format!("{col} {lower} {expr}"));
            }
            if let Some(bound) = max_value {
                let expr = render_bound(bound, &test.name, renderer)?;
                conditions.push(format!("{col} {upper} {expr}"));
            }
            format!(
                "SELECT {col} FROM {table} WHERE NOT ({})",
                conditions.join(" AND ")
            )
        }

        TestKind::OddsSportKey { sport } => {
            let sport = resolve_sport(*sport, model, &test.name)?;
            let key = quote_literal(sport.sport_key());
            format!("SELECT {col} FROM {table} WHERE {col} IS NOT NULL AND {col} <> {key}")
        }

        TestKind::OddsAmericanPrice => {
            let price = format!("CAST({col} AS DOUBLE)");
            format!(
                "SELECT {col} FROM {table} WHERE {col} IS NOT NULL \
                 AND (abs({price}) < 100 OR {price} <> trunc({price}))"
            )
        }

        TestKind::OddsSnapshotGrid {
            commence_column,
            interval_minutes,
            window_minutes,
        } => {
            let window = match window_minutes {
                Some(minutes) => *minutes,
                None => resolve_sport(None, model, &test.name)?.snapshot_window_minutes(),
            };
            let start = format!("CAST({} AS TIMESTAMPTZ)", quote_identifier(commence_column));
            let snap = format!("CAST({col} AS TIMESTAMPTZ)");
            let interval_seconds = u64::from(*interval_minutes) * 60;
            format!(
                "SELECT {col} FROM {table} WHERE {col} IS NOT NULL \
                 AND {start} IS NOT NULL \
                 AND (date_diff('second', {start}, {snap}) < 0 \
                 OR date_diff('second', {start}, {snap}) > {window_seconds} \
                 OR date_diff('second', {start}, {snap}) % {interval_seconds} <> 0)",
                window_seconds = u64::from(window) * 60,
            )
        }
    };

    Ok(sql)
}

/// The explicit league, or the one encoded in `stg_<league>_odds`.
fn resolve_sport(
    sport: Option<Sport>,
    model: &str,
    test_name: &str,
) -> Result<Sport, DomainError> {
    sport
        .or_else(|| Sport::from_model_name(model))
        .ok_or_else(|| DomainError::InvalidTestConfig {
            model: model.to_string(),
            column: String::new(),
            test: test_name.to_string(),
            reason: "cannot infer the league from the model name; set 'sport'".to_string(),
        })
}

fn render_bound(
    bound: &Bound,
    test_name: &str,
    renderer: &dyn TemplateEngine,
) -> Result<String, DomainError> {
    match bound {
        Bound::Literal(n) => Ok(n.clone()),
        Bound::Expression(raw) => {
            let rendered = if raw.contains("{{") || raw.contains("{%") {
                renderer.render(raw)?
            } else {
                raw.clone()
            };
            let rendered = rendered.trim().to_string();

            validate_expression(&rendered).map_err(|reason| DomainError::InvalidBound {
                test: test_name.to_string(),
                expression: rendered.clone(),
                reason,
            })?;
            Ok(rendered)
        }
    }
}

/// Accepts exactly one SQL expression, nothing trailing.
fn validate_expression(expr: &str) -> Result<(), String> {
    let dialect = GenericDialect {};
    let mut parser = Parser::new(&dialect)
        .try_with_sql(expr)
        .map_err(|e| e.to_string())?;
    parser.parse_expr().map_err(|e| e.to_string())?;
    parser.expect_token(&Token::EOF).map_err(|e| e.to_string())?;
    Ok(())
}
