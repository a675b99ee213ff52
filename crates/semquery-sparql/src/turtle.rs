//! Turtle/SPARQL surface forms for pages, properties and literals.

use semquery_description::value::{namespace_prefix, NS_MAIN};
use semquery_description::{DataValue, PageRef, PropertyRef};

use crate::vocab::{
    fixed_predicate_qname, AUX_SUFFIX, PROPERTY_PREFIX, XSD_BOOLEAN, XSD_DATE, XSD_DOUBLE,
    XSD_STRING,
};

/// Encode a title for use inside an IRI or a prefixed name.
///
/// Spaces become `_`; anything outside `[A-Za-z0-9_]` is written as `-XX`
/// per UTF-8 byte (so `-` itself becomes `-2D`).
pub fn encode_name(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ' ' {
            out.push('_');
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("-{b:02X}"));
            }
        }
    }
    out
}

/// Escape a string for a double-quoted SPARQL literal.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            other => out.push(other),
        }
    }
    out
}

pub fn typed_literal(lexical: &str, datatype: &str) -> String {
    format!("\"{}\"^^{datatype}", escape_literal(lexical))
}

/// Resource of a page. Pages outside the main namespace keep their
/// namespace, so `Category:Berlin` and `Berlin` stay distinct.
pub fn page_resource(page: &PageRef, iri_base: &str) -> String {
    let name = match namespace_prefix(page.namespace) {
        Some(prefix) => format!("{prefix}:{}", page.title),
        None if page.namespace == NS_MAIN => page.title.clone(),
        None => format!("NS{}:{}", page.namespace, page.title),
    };
    format!("<{iri_base}{}>", encode_name(&name))
}

/// Resource of a category used as a class (`rdf:type` object).
pub fn category_resource(category: &PageRef, iri_base: &str) -> String {
    format!("<{iri_base}{}>", encode_name(&category.title))
}

/// The literal a page's sort key is stored as.
pub fn sort_key_literal(page: &PageRef) -> String {
    typed_literal(&page.sort_key(), XSD_STRING)
}

/// Predicate for a property: its fixed mapping if predefined, otherwise the
/// `property:` name, with the auxiliary suffix for types stored twice.
pub fn property_predicate(property: &PropertyRef) -> String {
    if let Some(fixed) = property.predefined().and_then(|p| p.predicate) {
        return fixed_predicate_qname(fixed).to_string();
    }
    let name = if property.is_predefined() {
        encode_name(&property.label())
    } else {
        encode_name(&property.key)
    };
    if property.is_auxiliary() {
        format!("{PROPERTY_PREFIX}{name}{AUX_SUFFIX}")
    } else {
        format!("{PROPERTY_PREFIX}{name}")
    }
}

/// Main term of a value, or `None` for kinds the store cannot represent.
pub fn value_term(value: &DataValue, iri_base: &str) -> Option<String> {
    match value {
        DataValue::Page(page) => Some(page_resource(page, iri_base)),
        DataValue::Number(n) => Some(typed_literal(&n.to_string(), XSD_DOUBLE)),
        DataValue::Text(s) => Some(typed_literal(s, XSD_STRING)),
        DataValue::Uri(uri) => Some(format!("<{uri}>")),
        DataValue::Boolean(b) => Some(typed_literal(&b.to_string(), XSD_BOOLEAN)),
        DataValue::Time(t) => Some(typed_literal(&t.iso_date(), XSD_DATE)),
        DataValue::GeoCoord { .. } | DataValue::Concept(_) => None,
    }
}

/// Auxiliary (comparison) term for values stored twice.
pub fn helper_term(value: &DataValue) -> Option<String> {
    match value {
        DataValue::Time(t) => Some(typed_literal(&t.julian_day().to_string(), XSD_DOUBLE)),
        _ => None,
    }
}

/// The term used when matching a value: helper form first.
pub fn match_term(value: &DataValue, iri_base: &str) -> Option<String> {
    helper_term(value).or_else(|| value_term(value, iri_base))
}

/// Turn a `LIKE` pattern into an anchored regex (`*` any run, `?` one char).
///
/// The result is already escaped as the body of a SPARQL string literal.
pub fn like_pattern_regex(pattern: &str) -> String {
    escape_literal(&anchored_regex(pattern, true))
}

/// Anchored regex matching `text` literally, escaped like [`like_pattern_regex`].
pub fn exact_regex(text: &str) -> String {
    escape_literal(&anchored_regex(text, false))
}

fn anchored_regex(pattern: &str, wildcards: bool) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('^');
    for c in pattern.chars() {
        match c {
            '*' if wildcards => out.push_str(".*"),
            '?' if wildcards => out.push('.'),
            '^' | '.' | '\\' | '+' | '{' | '}' | '(' | ')' | '|' | '$' | '[' | ']' | '*' | '?' => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out.push('$');
    out
}
