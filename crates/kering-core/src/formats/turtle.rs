//! # Turtle Format
//!
//! Textual serialization of statement graphs, a strict subset of Turtle:
//!
//! - `@prefix` declarations first, then one `subject predicate object .`
//!   line per statement, in insertion order
//! - IRIs as prefixed names where a declared namespace applies, `<...>`
//!   otherwise; characters Turtle forbids inside `<...>` (whitespace,
//!   controls, angle brackets, quotes) are written as `\uXXXX` escapes
//! - literals as `"..."` (escaped), `"2025-01-01"^^xsd:date, or
//!   `"Good"^^nen2767:ConditionScore`
//! - `#` comment lines and blank lines tolerated on load; `a` accepted for
//!   `rdf:type` on load, never emitted
//!
//! Anything else fails the load. This is a pure text transformation;
//! file I/O lives in the storage layer.

use crate::graph::Graph;
use crate::types::{ConditionScore, Iri, KeringError, Literal, Statement, Term};
use crate::vocab;
use chrono::NaiveDate;
use std::collections::BTreeMap;

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Serialize a graph to Turtle text.
///
/// Statement order follows the graph's insertion order, so repeated
/// serialization of the same graph is byte-identical.
#[must_use]
pub fn graph_to_turtle(graph: &Graph) -> String {
    let mut out = String::new();
    for (prefix, namespace) in vocab::PREFIXES {
        out.push_str("@prefix ");
        out.push_str(prefix);
        out.push_str(": <");
        out.push_str(namespace);
        out.push_str("> .\n");
    }
    out.push('\n');
    for statement in graph.scan() {
        out.push_str(&render_statement(statement));
        out.push('\n');
    }
    out
}

fn render_statement(statement: &Statement) -> String {
    format!(
        "{} {} {} .",
        render_iri(&statement.subject),
        render_iri(&statement.predicate),
        render_term(&statement.object)
    )
}

fn render_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => render_iri(iri),
        Term::Literal(literal) => render_literal(literal),
    }
}

fn render_iri(iri: &Iri) -> String {
    for (prefix, namespace) in vocab::PREFIXES {
        if let Some(local) = iri.as_str().strip_prefix(namespace) {
            if is_safe_local(local) {
                return format!("{prefix}:{local}");
            }
        }
    }
    let mut out = String::with_capacity(iri.as_str().len() + 2);
    out.push('<');
    for c in iri.as_str().chars() {
        if iri_char_needs_escape(c) {
            out.push_str(&format!("\\u{:04X}", u32::from(c)));
        } else {
            out.push(c);
        }
    }
    out.push('>');
    out
}

/// Characters that must not appear raw inside `<...>`: whitespace and
/// controls (they break term splitting), the bracket/quote family, and the
/// escape character itself. All of them are ASCII, so `\uXXXX` always
/// suffices.
fn iri_char_needs_escape(c: char) -> bool {
    c <= '\u{20}' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

/// Local names are emitted in prefixed form only when they cannot confuse
/// the line-oriented parser; everything else falls back to `<...>`.
fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn render_literal(literal: &Literal) -> String {
    // Datatype prefixes used here must stay declared in vocab::PREFIXES.
    match literal {
        Literal::Str(s) => format!("\"{}\"", escape(s)),
        Literal::Date(d) => format!("\"{}\"^^xsd:date", d.format("%Y-%m-%d")),
        Literal::Condition(c) => format!("\"{}\"^^nen2767:ConditionScore", c.label()),
    }
}

fn escape(lexical: &str) -> String {
    let mut out = String::with_capacity(lexical.len());
    for c in lexical.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse Turtle text into a graph.
///
/// The whole text must parse; the first offending line aborts the load with
/// `KeringError::CorruptStore` carrying its 1-based line number. Duplicate
/// statements are absorbed. The returned graph is clean (matches the text
/// it came from).
pub fn graph_from_turtle(text: &str) -> Result<Graph, KeringError> {
    let mut prefixes: BTreeMap<String, String> = BTreeMap::new();
    let mut graph = Graph::new();

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("@prefix") {
            if rest.starts_with(char::is_whitespace) {
                let (name, namespace) = parse_prefix_line(rest).map_err(|reason| {
                    KeringError::CorruptStore {
                        line: number,
                        reason,
                    }
                })?;
                prefixes.insert(name, namespace);
                continue;
            }
        }
        let statement =
            parse_statement_line(line, &prefixes).map_err(|reason| KeringError::CorruptStore {
                line: number,
                reason,
            })?;
        graph.append(statement);
    }

    graph.mark_clean();
    Ok(graph)
}

fn parse_prefix_line(rest: &str) -> Result<(String, String), String> {
    let body = rest
        .trim()
        .strip_suffix('.')
        .ok_or_else(|| "prefix declaration must end with '.'".to_string())?;
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let [name_token, namespace_token] = tokens.as_slice() else {
        return Err("malformed prefix declaration".to_string());
    };
    let name = name_token
        .strip_suffix(':')
        .ok_or_else(|| "prefix name must end with ':'".to_string())?;
    if name.is_empty() {
        return Err("empty prefix name".to_string());
    }
    let namespace = namespace_token
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| "namespace must be enclosed in <...>".to_string())?;
    Ok((name.to_string(), namespace.to_string()))
}

fn parse_statement_line(
    line: &str,
    prefixes: &BTreeMap<String, String>,
) -> Result<Statement, String> {
    let body = line
        .strip_suffix('.')
        .ok_or_else(|| "statement must end with '.'".to_string())?
        .trim_end();

    let terms = split_terms(body)?;
    let [subject_token, predicate_token, object_token] = terms.as_slice() else {
        return Err(format!("expected 3 terms, found {}", terms.len()));
    };

    let subject = match parse_term(subject_token, prefixes)? {
        Term::Iri(iri) => iri,
        Term::Literal(_) => return Err("subject must be an IRI".to_string()),
    };
    let predicate = if *predicate_token == "a" {
        Iri::new(vocab::RDF_TYPE)
    } else {
        match parse_term(predicate_token, prefixes)? {
            Term::Iri(iri) => iri,
            Term::Literal(_) => return Err("predicate must be an IRI".to_string()),
        }
    };
    let object = parse_term(object_token, prefixes)?;

    Ok(Statement::new(subject, predicate, object))
}

/// Split a statement body into term tokens.
///
/// Delimiters are all ASCII, so byte scanning never lands inside a
/// multi-byte character.
fn split_terms(body: &str) -> Result<Vec<&str>, String> {
    let bytes = body.as_bytes();
    let n = bytes.len();
    let mut terms = Vec::new();
    let mut i = 0;

    while i < n {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        match bytes[i] {
            b'<' => {
                i += 1;
                while i < n && bytes[i] != b'>' {
                    i += 1;
                }
                if i >= n {
                    return Err("unterminated IRI".to_string());
                }
                i += 1;
            }
            b'"' => {
                i += 1;
                loop {
                    if i >= n {
                        return Err("unterminated string literal".to_string());
                    }
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                if i + 1 < n && bytes[i] == b'^' && bytes[i + 1] == b'^' {
                    i += 2;
                    if i < n && bytes[i] == b'<' {
                        i += 1;
                        while i < n && bytes[i] != b'>' {
                            i += 1;
                        }
                        if i >= n {
                            return Err("unterminated datatype IRI".to_string());
                        }
                        i += 1;
                    } else {
                        while i < n && !bytes[i].is_ascii_whitespace() {
                            i += 1;
                        }
                    }
                }
            }
            _ => {
                while i < n && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
            }
        }
        terms.push(&body[start..i]);
    }

    Ok(terms)
}

fn parse_term(token: &str, prefixes: &BTreeMap<String, String>) -> Result<Term, String> {
    if token.len() > crate::primitives::MAX_TERM_LENGTH {
        return Err(format!(
            "term of {} bytes exceeds maximum {}",
            token.len(),
            crate::primitives::MAX_TERM_LENGTH
        ));
    }
    if let Some(rest) = token.strip_prefix('<') {
        let iri = rest
            .strip_suffix('>')
            .ok_or_else(|| "unterminated IRI".to_string())?;
        return Ok(Term::Iri(Iri::new(decode_iri(iri)?)));
    }
    if token.starts_with('"') {
        return parse_literal(token, prefixes).map(Term::Literal);
    }
    resolve_prefixed(token, prefixes).map(Term::Iri)
}

/// Decode `\uXXXX` / `\UXXXXXXXX` escapes inside an IRI reference.
fn decode_iri(raw: &str) -> Result<String, String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let width = match chars.next() {
            Some('u') => 4,
            Some('U') => 8,
            other => {
                let shown = other.map_or(String::new(), String::from);
                return Err(format!("unsupported IRI escape \\{shown}"));
            }
        };
        let hex: String = chars.by_ref().take(width).collect();
        if hex.len() != width {
            return Err("truncated \\u escape in IRI".to_string());
        }
        let code = u32::from_str_radix(&hex, 16)
            .map_err(|_| format!("invalid hex digits in IRI escape: {hex:?}"))?;
        let decoded = char::from_u32(code)
            .ok_or_else(|| format!("IRI escape is not a code point: {hex:?}"))?;
        out.push(decoded);
    }
    Ok(out)
}

fn resolve_prefixed(token: &str, prefixes: &BTreeMap<String, String>) -> Result<Iri, String> {
    let (prefix, local) = token
        .split_once(':')
        .ok_or_else(|| format!("not a valid term: {token:?}"))?;
    let namespace = prefixes
        .get(prefix)
        .ok_or_else(|| format!("unknown prefix {prefix:?}"))?;
    Ok(Iri::new(format!("{namespace}{local}")))
}

fn parse_literal(token: &str, prefixes: &BTreeMap<String, String>) -> Result<Literal, String> {
    let (escaped, rest) = split_lexical(token)?;
    let lexical = unescape(escaped)?;

    if rest.is_empty() {
        return Ok(Literal::Str(lexical));
    }
    let datatype_token = rest
        .strip_prefix("^^")
        .ok_or_else(|| format!("garbage after string literal: {rest:?}"))?;

    let datatype = if let Some(inner) = datatype_token.strip_prefix('<') {
        let raw = inner
            .strip_suffix('>')
            .ok_or_else(|| "unterminated datatype IRI".to_string())?;
        decode_iri(raw)?
    } else {
        resolve_prefixed(datatype_token, prefixes)?.0
    };

    match datatype.as_str() {
        vocab::XSD_DATE => {
            let date = NaiveDate::parse_from_str(&lexical, "%Y-%m-%d")
                .map_err(|e| format!("invalid xsd:date {lexical:?}: {e}"))?;
            Ok(Literal::Date(date))
        }
        vocab::CONDITION_SCORE => {
            let condition = ConditionScore::parse(&lexical)
                .map_err(|_| format!("unknown condition label {lexical:?}"))?;
            Ok(Literal::Condition(condition))
        }
        other => Err(format!("unsupported datatype <{other}>")),
    }
}

/// Split a quoted token into its escaped lexical form and the remainder
/// after the closing quote.
fn split_lexical(token: &str) -> Result<(&str, &str), String> {
    let bytes = token.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Ok((&token[1..i], &token[i + 1..])),
            _ => i += 1,
        }
    }
    Err("unterminated string literal".to_string())
}

fn unescape(escaped: &str) -> Result<String, String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => return Err(format!("unsupported escape sequence \\{other}")),
            None => return Err("dangling escape at end of literal".to_string()),
        }
    }
    Ok(out)
}

// =============================================================================
// TESTS
// =============================================================================
