//! Simple selector conditions.
//! Reference: Selectors Level 3 §6 — Simple selectors

use crate::{AttributeResolver, SelectorError, TreeResolver};

/// Namespace, name and comparison value of an attribute selector.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// Attribute namespace; `None` selects attributes without a namespace.
    pub namespace: Option<String>,
    /// Attribute local name.
    pub name: String,
    /// Right-hand side of the comparison.
    pub value: String,
}

impl AttributeSelector {
    /// Attribute selector without a namespace.
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One simple-selector facet tested against a single element.
///
/// Conditions never fail: when a resolver is missing or cannot supply the
/// needed fact the condition simply does not match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `[name]`
    AttributeExists {
        /// Attribute namespace.
        namespace: Option<String>,
        /// Attribute local name.
        name: String,
    },
    /// `[name=value]`
    AttributeEquals(AttributeSelector),
    /// `[name^=value]`
    AttributePrefix(AttributeSelector),
    /// `[name$=value]`
    AttributeSuffix(AttributeSelector),
    /// `[name*=value]`
    AttributeSubstring(AttributeSelector),
    /// `[name~=value]`: one of the whitespace separated tokens equals `value`.
    AttributeMatchesList(AttributeSelector),
    /// `[name|=value]`: the text before the first `-` equals `value`.
    AttributeMatchesFirstSegment(AttributeSelector),
    /// `.name`
    Class(String),
    /// `#value`
    Id(String),
    /// `:lang(value)`
    Lang(String),
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:nth-child(an+b)` where `step` is `a` and `offset` is `b`.
    NthChild {
        /// Cycle length `a`.
        step: i32,
        /// One-based offset `b`.
        offset: i32,
    },
    /// Element sits at an even one-based position.
    EvenChild,
    /// Element sits at an odd one-based position.
    OddChild,
    /// `:link`
    Link,
    /// Placeholder for syntax the matcher does not understand. Never matches.
    Unsupported,
}

impl Condition {
    /// Build an `:nth-child()` condition from its argument text.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidNth` when the argument is neither a keyword,
    /// an integer, nor of the form `an+b`.
    #[inline]
    pub fn nth_child(argument: &str) -> Result<Self, SelectorError> {
        let (step, offset) = parse_nth_child(argument)?;
        Ok(Self::NthChild { step, offset })
    }

    /// True for `#id` conditions, which weigh in the id column of specificity.
    #[inline]
    pub const fn is_id(&self) -> bool {
        matches!(self, Self::Id(_))
    }

    /// Test this condition against `element`.
    pub fn matches<E: Copy>(
        &self,
        element: E,
        attributes: Option<&dyn AttributeResolver<E>>,
        tree: Option<&dyn TreeResolver<E>>,
    ) -> bool {
        match self {
            Self::AttributeExists { namespace, name } => attributes.is_some_and(|resolver| {
                resolver
                    .attribute_value(element, namespace.as_deref(), name)
                    .is_some()
            }),
            Self::AttributeEquals(attr) => {
                attribute_test(attributes, element, attr, |value, expected| value == expected)
            }
            Self::AttributePrefix(attr) => {
                attribute_test(attributes, element, attr, |value, expected| value.starts_with(expected))
            }
            Self::AttributeSuffix(attr) => {
                attribute_test(attributes, element, attr, |value, expected| value.ends_with(expected))
            }
            Self::AttributeSubstring(attr) => {
                attribute_test(attributes, element, attr, |value, expected| value.contains(expected))
            }
            Self::AttributeMatchesList(attr) => {
                attribute_test(attributes, element, attr, contains_token)
            }
            Self::AttributeMatchesFirstSegment(attr) => {
                attribute_test(attributes, element, attr, |value, expected| {
                    value.split('-').next() == Some(expected)
                })
            }
            Self::Class(name) => attributes
                .and_then(|resolver| resolver.class(element))
                .is_some_and(|classes| contains_token(classes, name)),
            Self::Id(expected) => attributes
                .and_then(|resolver| resolver.id(element))
                .is_some_and(|id| id == expected),
            Self::Lang(expected) => attributes
                .and_then(|resolver| resolver.lang(element))
                .is_some_and(|lang| lang_matches(lang, expected)),
            Self::FirstChild => tree.is_some_and(|resolver| resolver.is_first_child_element(element)),
            Self::LastChild => tree.is_some_and(|resolver| resolver.is_last_child_element(element)),
            Self::NthChild { step, offset } => {
                position_of(tree, element).is_some_and(|position| nth_matches(*step, *offset, position))
            }
            Self::EvenChild => position_of(tree, element).is_some_and(|position| position % 2 == 1),
            Self::OddChild => position_of(tree, element).is_some_and(|position| position % 2 == 0),
            Self::Link => attributes.is_some_and(|resolver| resolver.is_link(element)),
            Self::Unsupported => false,
        }
    }
}

/// Look up the attribute named by `attr` and compare it with `compare`.
fn attribute_test<E: Copy>(
    attributes: Option<&dyn AttributeResolver<E>>,
    element: E,
    attr: &AttributeSelector,
    compare: impl Fn(&str, &str) -> bool,
) -> bool {
    attributes
        .and_then(|resolver| resolver.attribute_value(element, attr.namespace.as_deref(), &attr.name))
        .is_some_and(|value| compare(value, &attr.value))
}

/// True when one of the whitespace separated tokens of `list` equals `token`.
fn contains_token(list: &str, token: &str) -> bool {
    list.split_ascii_whitespace().any(|candidate| candidate == token)
}

/// `:lang()` matches the full tag or its primary subtag, ignoring ASCII case.
fn lang_matches(lang: &str, expected: &str) -> bool {
    if lang.eq_ignore_ascii_case(expected) {
        return true;
    }
    lang.split('-')
        .next()
        .is_some_and(|primary| primary.eq_ignore_ascii_case(expected))
}

/// Zero-based element position, if the tree resolver knows it.
fn position_of<E: Copy>(tree: Option<&dyn TreeResolver<E>>, element: E) -> Option<usize> {
    tree.and_then(|resolver| resolver.position_of_element(element))
}

/// Evaluate `an+b` against a zero-based sibling position.
///
/// The one-based position minus `b` must be a non-negative multiple of `a`
/// when `a` is negative, an exact zero when `a` is zero, and divisible by `a`
/// otherwise.
fn nth_matches(step: i32, offset: i32, zero_based: usize) -> bool {
    let Ok(index) = i64::try_from(zero_based) else {
        return false;
    };
    let relative = index + 1 - i64::from(offset);
    if step == 0 {
        return relative == 0;
    }
    if step < 0 && relative > 0 {
        return false;
    }
    relative.rem_euclid(i64::from(step)) == 0
}

/// Parse the argument of `:nth-child()` into `(a, b)`.
///
/// Accepts `even`, `odd`, a bare integer, or `[+-]?\d*n([+-]\d+)?` with no inner
/// whitespace. A missing coefficient means a magnitude of one.
///
/// # Errors
/// Returns `SelectorError::InvalidNth` carrying the original text when nothing matches.
pub fn parse_nth_child(argument: &str) -> Result<(i32, i32), SelectorError> {
    let normalized = argument.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "even" => return Ok((2, 0)),
        "odd" => return Ok((2, 1)),
        _ => {}
    }
    if let Ok(offset) = normalized.parse::<i32>() {
        return Ok((0, offset));
    }
    parse_an_plus_b(&normalized).ok_or_else(|| SelectorError::InvalidNth(argument.to_owned()))
}

/// Parse the `an+b` form. Returns `None` on any deviation from the grammar.
fn parse_an_plus_b(text: &str) -> Option<(i32, i32)> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (coefficient, tail) = unsigned.split_once('n')?;
    let magnitude = if coefficient.is_empty() {
        1
    } else {
        parse_digits(coefficient)?
    };
    let step = if negative { magnitude.checked_neg()? } else { magnitude };
    let offset = if tail.is_empty() {
        0
    } else if let Some(digits) = tail.strip_prefix('+') {
        parse_digits(digits)?
    } else {
        parse_digits(tail.strip_prefix('-')?)?.checked_neg()?
    };
    Some((step, offset))
}

/// Parse a non-empty run of ASCII digits.
fn parse_digits(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
