//! Which table a result column came from.
//!
//! [`HeuristicProvenance`] reads table names out of the FROM/JOIN text and matches them
//! against `Table..Column..` aliases. It is not a parser: columns that are not aliased
//! in that convention get no table.

use regex::Regex;
use std::sync::OnceLock;

pub trait ProvenanceResolver: Send + Sync {
    /// Candidate source tables named by the statement, in order of appearance.
    fn source_tables(&self, sql: &str) -> Vec<String>;

    /// Table a result column belongs to, among `tables`.
    fn table_for<'t>(&self, column: &str, tables: &'t [String]) -> Option<&'t str> {
        tables
            .iter()
            .find(|t| column.starts_with(&format!("{}.", t)))
            .map(String::as_str)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicProvenance;

const JOIN_QUALIFIERS: &[&str] = &["LEFT", "RIGHT", "INNER", "OUTER", "CROSS", "FULL", "NATURAL"];

fn from_clause_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)\bFROM\b(.*?)(?:\bWHERE\b|\bGROUP\s+BY\b|\bORDER\s+BY\b|\bHAVING\b|\bLIMIT\b|\bUNION\b|;|$)")
            .expect("valid FROM regex")
    })
}

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bJOIN\b|\bON\b|,").expect("valid separator regex"))
}

fn unquote(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '`' || c == '[' || c == ']')
}

impl ProvenanceResolver for HeuristicProvenance {
    fn source_tables(&self, sql: &str) -> Vec<String> {
        let Some(caps) = from_clause_re().captures(sql) else {
            return Vec::new();
        };
        let clause = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let mut tables: Vec<String> = Vec::new();
        for segment in separator_re().split(clause) {
            let name = segment
                .split_whitespace()
                .find(|tok| !JOIN_QUALIFIERS.iter().any(|q| tok.eq_ignore_ascii_case(q)));
            let Some(name) = name else { continue };
            if name.contains(['.', '=', '(', ')']) {
                continue;
            }
            let name = unquote(name);
            if !name.is_empty() && !tables.iter().any(|t| t == name) {
                tables.push(name.to_string());
            }
        }
        tables
    }
}
