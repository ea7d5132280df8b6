// betflow-core/src/infrastructure/config/disabled.rs
//
// Commented-out test entries disappear when YAML is parsed. They are read
// back from the raw text so `inspect --disabled` can list them.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::domain::quality::data_test::is_known_test;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DisabledTest {
    /// 1-based line number of the commented entry.
    pub line: usize,
    pub model: Option<String>,
    pub column: Option<String>,
    pub name: String,
    /// Whether the engine would accept the test if it were re-enabled.
    pub recognised: bool,
    /// Anchor of the column list the entry was written in, if any.
    pub anchor: Option<String>,
    /// True when `model` reaches the entry through an alias of `anchor`.
    pub aliased: bool,
}

fn re_name_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(\s*)-\s+name:\s*["']?([^"'#\s]+)"#)
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

fn re_disabled_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^-\s*([A-Za-z_][A-Za-z0-9_.]*)\s*(?::|$)")
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

fn re_columns_ref() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^columns:\s*([&*])([A-Za-z0-9_-]+)")
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

/// Entries declared under an anchored column list are also reported for
/// every model that aliases that list.
pub fn scan_disabled_tests(content: &str) -> Vec<DisabledTest> {
    let mut found = Vec::new();
    let mut anchor: Option<String> = None;
    let mut aliases: Vec<(String, String)> = Vec::new();

    let mut in_models = false;
    let mut model_indent: Option<usize> = None;
    let mut model: Option<String> = None;
    let mut column: Option<String> = None;
    let mut tests_indent: Option<usize> = None;

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        let indent = line.len() - trimmed.len();

        if let Some(payload) = trimmed.strip_prefix('#') {
            if !in_models {
                continue;
            }
            let body = payload.trim_start();
            // Column the payload would sit at once the comment marker is removed.
            let column_at = indent + 1 + (payload.len() - body.len());

            if body.starts_with("tests:") {
                tests_indent = Some(column_at);
                continue;
            }
            let Some(block) = tests_indent else {
                continue;
            };
            if column_at < block || column_at > block + 4 {
                continue;
            }
            if let Some(cap) = re_disabled_item().captures(body) {
                let name = &cap[1];
                if name == "name" {
                    continue;
                }
                found.push(DisabledTest {
                    line: idx + 1,
                    model: model.clone(),
                    column: column.clone(),
                    name: name.to_string(),
                    recognised: is_known_test(name),
                    anchor: anchor.clone(),
                    aliased: false,
                });
            }
            continue;
        }

        if indent == 0 {
            in_models = trimmed.starts_with("models:");
            model_indent = None;
            model = None;
            column = None;
            tests_indent = None;
            anchor = None;
            continue;
        }

        if !in_models {
            continue;
        }

        if column.is_none() {
            if let Some(cap) = re_columns_ref().captures(trimmed) {
                match (&cap[1], &model) {
                    ("&", _) => anchor = Some(cap[2].to_string()),
                    (_, Some(m)) => aliases.push((m.clone(), cap[2].to_string())),
                    _ => {}
                }
                continue;
            }
        }

        if trimmed.starts_with("tests:") {
            tests_indent = Some(indent);
            continue;
        }

        if let Some(cap) = re_name_item().captures(line) {
            let item_indent = cap[1].len();
            let name = cap[2].to_string();
            tests_indent = None;
            match model_indent {
                Some(mi) if item_indent > mi => column = Some(name),
                _ => {
                    model_indent = Some(item_indent);
                    model = Some(name);
                    column = None;
                    anchor = None;
                }
            }
        }
    }

    let declared = found.clone();
    for (alias_model, alias) in aliases {
        for entry in declared
            .iter()
            .filter(|d| d.anchor.as_deref() == Some(alias.as_str()))
        {
            found.push(DisabledTest {
                model: Some(alias_model.clone()),
                aliased: true,
                ..entry.clone()
            });
        }
    }

    found
}
