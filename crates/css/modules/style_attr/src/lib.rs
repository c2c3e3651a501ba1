//! CSS Style Attributes — style="..." attribute processing.
//! Reference: <https://www.w3.org/TR/css-style-attr/>

#![forbid(unsafe_code)]

use css_cascade::{Declaration, Origin, StylesheetFactory};

/// Parse the value of a `style` attribute into a list of declarations.
///
/// - Splits on semicolons (`;`) into declaration items.
/// - For each item, splits on the first colon (`:`) into property and value.
/// - Trims ASCII whitespace and lowercases the property name.
/// - A trailing `!important` (any case, whitespace allowed after `!`) sets the
///   importance flag and is removed from the value.
/// - Skips empty or invalid items (no colon, empty property, or empty value after trimming).
///
/// Reference: <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn parse_style_attribute(input: &str, origin: Origin) -> Vec<Declaration> {
    if input.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<Declaration> = Vec::new();
    for raw_item in input.split(';') {
        let item = raw_item.trim_matches(is_ascii_whitespace);
        if item.is_empty() {
            continue;
        }
        let Some((raw_prop, raw_value)) = item.split_once(':') else {
            continue;
        };
        let property_text = raw_prop.trim_matches(is_ascii_whitespace);
        let (value_text, important) = split_important(raw_value.trim_matches(is_ascii_whitespace));
        if property_text.is_empty() || value_text.is_empty() {
            continue;
        }
        out.push(Declaration {
            property: property_text.to_ascii_lowercase(),
            value: value_text.to_owned(),
            important,
            origin,
        });
    }
    out
}

/// Strip a trailing `!important` from a trimmed value.
///
/// Reference: <https://www.w3.org/TR/css-cascade-4/#importance>
fn split_important(value: &str) -> (&str, bool) {
    let Some((head, tail)) = value.rsplit_once('!') else {
        return (value, false);
    };
    if tail
        .trim_start_matches(is_ascii_whitespace)
        .eq_ignore_ascii_case("important")
    {
        return (head.trim_end_matches(is_ascii_whitespace), true);
    }
    (value, false)
}

/// ASCII whitespace per CSS Syntax (TAB, LF, FF, CR, SPACE).
///
/// Reference: <https://www.w3.org/TR/css-syntax-3/#whitespace>
const fn is_ascii_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}

/// Default `StylesheetFactory`: reads declaration blocks with
/// `parse_style_attribute`. Relative URLs are left untouched, so the base URI
/// is not consulted.
#[derive(Clone, Copy, Debug, Default)]
pub struct StyleAttributeFactory;

impl StylesheetFactory for StyleAttributeFactory {
    #[inline]
    fn parse_style_declaration(
        &self,
        origin: Origin,
        text: &str,
        _base_uri: Option<&str>,
    ) -> Vec<Declaration> {
        parse_style_attribute(text, origin)
    }
}
