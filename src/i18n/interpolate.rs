//! `{{variable}}` placeholder substitution.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Resource-layer interpolation.
///
/// Whitespace inside the braces is ignored (`{{ name }}`). Placeholders without
/// a matching variable stay as written.
#[must_use]
pub fn interpolate<'a>(template: &'a str, variables: &BTreeMap<String, String>) -> Cow<'a, str> {
    if variables.is_empty() || !template.contains("{{") {
        return Cow::Borrowed(template);
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((before, after_open)) = rest.split_once("{{") {
        output.push_str(before);
        let Some((name, after_close)) = after_open.split_once("}}") else {
            output.push_str("{{");
            rest = after_open;
            break;
        };

        if let Some(value) = variables.get(name.trim()) {
            output.push_str(value);
        } else {
            output.push_str("{{");
            output.push_str(name);
            output.push_str("}}");
        }
        rest = after_close;
    }

    output.push_str(rest);
    Cow::Owned(output)
}

/// Literal substitution: every `{{name}}` for every variable, exact match only.
#[must_use]
pub fn replace_placeholders(text: &str, variables: &BTreeMap<String, String>) -> String {
    variables
        .iter()
        .fold(text.to_string(), |acc, (name, value)| acc.replace(&format!("{{{{{name}}}}}"), value))
}
