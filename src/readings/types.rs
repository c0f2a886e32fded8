//! Reading record types
//!
//! Shapes mirror what the Analysis Service posts: a thesis, glossary key
//! terms, arguments with supporting evidence, and contextual prose. Key
//! terms are glossary chips, not prose, and are not annotatable.

use serde::{Deserialize, Serialize};

/// An analyzed reading as supplied by the Analysis Service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub week_number: i64,
    pub title: String,
    pub filename: String,
    pub author: Option<String>,
    #[serde(default)]
    pub thesis: String,
    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub historical_context: String,
    #[serde(default)]
    pub historiography: String,
    pub significance: Option<String>,
    pub created_at: String,
}

/// A glossary term/definition pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub definition: String,
}

/// One claim of the reading, with its supporting evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub argument: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// A quoted piece of evidence for an argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub text: String,
    #[serde(default)]
    pub page: String,
    pub explanation: Option<String>,
}

/// An annotatable prose field of a reading: a stable path plus its text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedField {
    pub path: String,
    pub text: String,
}

impl Reading {
    /// Enumerate the annotatable prose fields in display order.
    ///
    /// Paths are stable identifiers like `thesis` or
    /// `arguments[1].evidence[0].explanation`; empty fields are skipped.
    /// The annotation engine treats each returned field identically and
    /// independently.
    pub fn annotated_fields(&self) -> Vec<AnnotatedField> {
        let mut fields = Vec::new();
        let mut push = |path: String, text: &str| {
            if !text.is_empty() {
                fields.push(AnnotatedField {
                    path,
                    text: text.to_string(),
                });
            }
        };

        push("thesis".to_string(), &self.thesis);
        for (i, arg) in self.arguments.iter().enumerate() {
            push(format!("arguments[{}]", i), &arg.argument);
            for (j, ev) in arg.evidence.iter().enumerate() {
                push(format!("arguments[{}].evidence[{}]", i, j), &ev.text);
                if let Some(explanation) = &ev.explanation {
                    push(
                        format!("arguments[{}].evidence[{}].explanation", i, j),
                        explanation,
                    );
                }
            }
        }
        push("historical_context".to_string(), &self.historical_context);
        push("historiography".to_string(), &self.historiography);
        if let Some(significance) = &self.significance {
            push("significance".to_string(), significance);
        }

        fields
    }
}
