//! Literal encoder: one scalar value to its exact textual form.
//!
//! The target store's loader is strict about the grammar but performs no
//! value validation, and neither do we: callers gate on presence before a
//! value reaches the encoder, and the value text is emitted verbatim.

/// A typed object position. `Str` carries the Greek language tag; `Plain`
/// is an untagged string; `Integer`/`Date` are the two XSD-typed forms the
/// documents use; `Entity` is a local or absolute IRI reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term<'a> {
    Str(&'a str),
    Plain(&'a str),
    Number(&'a str),
    Bool(bool),
    Integer(&'a str),
    Date(&'a str),
    Entity(&'a str),
}

const XSD_INTEGER: &str = "<http://www.w3.org/2001/XMLSchema#integer>";
const XSD_DATE: &str = "<http://www.w3.org/2001/XMLSchema#date>";

/// Formats `\t<prefix>:<name> <object>` terminated with `;\n`, or `.\n\n`
/// when the triple closes its block.
pub(crate) fn format_triple(prefix: &str, name: &str, term: Term<'_>, last: bool) -> String {
    let mut line = format!("\t{prefix}:{name} ");
    match term {
        Term::Str(v) => {
            line.push('"');
            line.push_str(v);
            line.push_str("\"@el");
        }
        Term::Plain(v) => {
            line.push('"');
            line.push_str(v);
            line.push('"');
        }
        Term::Number(v) => line.push_str(v),
        Term::Bool(v) => line.push_str(if v { "true" } else { "false" }),
        Term::Integer(v) => {
            line.push('"');
            line.push_str(v);
            line.push_str("\"^^");
            line.push_str(XSD_INTEGER);
        }
        Term::Date(v) => {
            line.push('"');
            line.push_str(v);
            line.push_str("\"^^");
            line.push_str(XSD_DATE);
        }
        Term::Entity(v) => {
            line.push('<');
            line.push_str(v);
            line.push('>');
        }
    }
    if last {
        line.push_str(".\n\n");
    } else {
        line.push_str(";\n");
    }
    line
}
