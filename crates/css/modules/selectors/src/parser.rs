//! Compact selector notation parser.
//!
//! Reads the selector subset the matcher understands: type and universal
//! selectors, `.class`, `#id`, attribute operators (`= ~= |= ^= $= *=`),
//! structural and dynamic pseudo-classes, `:lang()`, pseudo-elements, and the
//! descendant, child and adjacent-sibling combinators. Pseudo-classes it does
//! not know become `Condition::Unsupported` so the rule simply never matches.

use crate::{
    Axis, AttributeSelector, ComplexSelector, CompoundSelector, Condition, DynamicPseudoClasses,
    SelectorError,
};

/// Pseudo-elements that CSS 2 allowed with a single colon.
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

/// Byte cursor over one complex selector.
struct SelectorTokenizer<'src> {
    /// Selector text being parsed.
    input: &'src str,
    /// Current byte offset into `input`.
    index: usize,
}

impl<'src> SelectorTokenizer<'src> {
    /// Construct a tokenizer from input.
    #[inline]
    const fn new(input: &'src str) -> Self {
        Self { input, index: 0 }
    }

    /// Next byte without consuming it.
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.index).copied()
    }

    /// Consume one byte.
    #[inline]
    fn bump(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    /// Consume `byte` if it is next.
    #[inline]
    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.bump();
            return true;
        }
        false
    }

    /// Skip ASCII whitespace, reporting whether any was seen.
    #[inline]
    fn skip_spaces(&mut self) -> bool {
        let start = self.index;
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.bump();
        }
        self.index != start
    }

    /// Build the error for the current input.
    fn error(&self) -> SelectorError {
        SelectorError::InvalidSelector(self.input.to_owned())
    }

    /// Consume an identifier made of ASCII alphanumerics, `-`, `_` and non-ASCII bytes.
    fn consume_ident(&mut self) -> &'src str {
        let start = self.index;
        while self
            .peek()
            .is_some_and(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || !byte.is_ascii())
        {
            self.bump();
        }
        self.input.get(start..self.index).unwrap_or_default()
    }

    /// Consume a non-empty identifier or fail.
    fn expect_ident(&mut self) -> Result<&'src str, SelectorError> {
        let ident = self.consume_ident();
        if ident.is_empty() {
            return Err(self.error());
        }
        Ok(ident)
    }

    /// Consume a quoted string whose opening quote is next, returning its contents.
    fn consume_quoted(&mut self, quote: u8) -> Result<&'src str, SelectorError> {
        self.bump();
        let start = self.index;
        while self.peek().is_some_and(|byte| byte != quote) {
            self.bump();
        }
        let value = self.input.get(start..self.index).unwrap_or_default();
        if !self.eat(quote) {
            return Err(self.error());
        }
        Ok(value)
    }

    /// Consume everything up to the matching `)`, returning the argument text.
    fn consume_arguments(&mut self) -> Result<&'src str, SelectorError> {
        let start = self.index;
        let mut depth = 1usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'(' => depth = depth.saturating_add(1),
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let argument = self.input.get(start..self.index).unwrap_or_default();
                        self.bump();
                        return Ok(argument);
                    }
                }
                _ => {}
            }
            self.bump();
        }
        Err(self.error())
    }

    /// Parse one compound selector. Fails if nothing selector-like is found.
    fn compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::any();
        let mut seen = false;
        if self.eat(b'*') {
            seen = true;
        } else if self
            .peek()
            .is_some_and(|byte| byte.is_ascii_alphabetic() || byte == b'_' || !byte.is_ascii())
        {
            compound.element_name = Some(self.consume_ident().to_ascii_lowercase());
            seen = true;
        }
        loop {
            match self.peek() {
                Some(b'.') => {
                    self.bump();
                    let class = self.expect_ident()?;
                    compound.conditions.push(Condition::Class(class.to_owned()));
                }
                Some(b'#') => {
                    self.bump();
                    let id = self.expect_ident()?;
                    compound.conditions.push(Condition::Id(id.to_owned()));
                }
                Some(b'[') => {
                    self.bump();
                    let condition = self.attribute()?;
                    compound.conditions.push(condition);
                }
                Some(b':') => {
                    self.bump();
                    self.pseudo(&mut compound)?;
                }
                _ => break,
            }
            seen = true;
        }
        if seen {
            Ok(compound)
        } else {
            Err(self.error())
        }
    }

    /// Parse an attribute selector; the opening `[` has been consumed.
    fn attribute(&mut self) -> Result<Condition, SelectorError> {
        self.skip_spaces();
        let name = self.expect_ident()?.to_owned();
        self.skip_spaces();
        if self.eat(b']') {
            return Ok(Condition::AttributeExists {
                namespace: None,
                name,
            });
        }
        let operator = match self.peek() {
            Some(b'=') => b'=',
            Some(prefix @ (b'~' | b'|' | b'^' | b'$' | b'*')) => {
                self.bump();
                prefix
            }
            _ => return Err(self.error()),
        };
        if !self.eat(b'=') {
            return Err(self.error());
        }
        self.skip_spaces();
        let value = match self.peek() {
            Some(quote @ (b'"' | b'\'')) => self.consume_quoted(quote)?,
            _ => self.expect_ident()?,
        };
        self.skip_spaces();
        if !self.eat(b']') {
            return Err(self.error());
        }
        let attr = AttributeSelector::new(name, value);
        Ok(match operator {
            b'~' => Condition::AttributeMatchesList(attr),
            b'|' => Condition::AttributeMatchesFirstSegment(attr),
            b'^' => Condition::AttributePrefix(attr),
            b'$' => Condition::AttributeSuffix(attr),
            b'*' => Condition::AttributeSubstring(attr),
            _ => Condition::AttributeEquals(attr),
        })
    }

    /// Parse a pseudo-class or pseudo-element; the first `:` has been consumed.
    fn pseudo(&mut self, compound: &mut CompoundSelector) -> Result<(), SelectorError> {
        if self.eat(b':') {
            let name = self.expect_ident()?;
            compound.pseudo_element = Some(name.to_ascii_lowercase());
            return Ok(());
        }
        let name = self.expect_ident()?.to_ascii_lowercase();
        let argument = if self.eat(b'(') {
            Some(self.consume_arguments()?)
        } else {
            None
        };
        match (name.as_str(), argument) {
            ("first-child", None) => compound.conditions.push(Condition::FirstChild),
            ("last-child", None) => compound.conditions.push(Condition::LastChild),
            ("even", None) => compound.conditions.push(Condition::EvenChild),
            ("odd", None) => compound.conditions.push(Condition::OddChild),
            ("link", None) => compound.conditions.push(Condition::Link),
            ("visited", None) => compound.pseudo_classes |= DynamicPseudoClasses::VISITED,
            ("hover", None) => compound.pseudo_classes |= DynamicPseudoClasses::HOVER,
            ("active", None) => compound.pseudo_classes |= DynamicPseudoClasses::ACTIVE,
            ("focus", None) => compound.pseudo_classes |= DynamicPseudoClasses::FOCUS,
            ("nth-child", Some(text)) => compound.conditions.push(Condition::nth_child(text)?),
            ("lang", Some(text)) => compound.conditions.push(Condition::Lang(text.trim().to_owned())),
            (legacy, None) if LEGACY_PSEUDO_ELEMENTS.contains(&legacy) => {
                compound.pseudo_element = Some(name);
            }
            _ => compound.conditions.push(Condition::Unsupported),
        }
        Ok(())
    }
}

/// Parse a comma separated selector list.
///
/// # Errors
/// Fails on the first selector that cannot be read; see `parse_complex_selector`.
pub fn parse_selector_list(input: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    split_selector_list(input)
        .into_iter()
        .map(parse_complex_selector)
        .collect()
}

/// Split on commas outside quotes, brackets and parentheses.
fn split_selector_list(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (index, byte) in input.bytes().enumerate() {
        match (quote, byte) {
            (Some(open), _) if byte == open => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(byte),
            (None, b'(' | b'[') => depth = depth.saturating_add(1),
            (None, b')' | b']') => depth = depth.saturating_sub(1),
            (None, b',') if depth == 0 => {
                parts.push(input.get(start..index).unwrap_or_default());
                start = index.saturating_add(1);
            }
            _ => {}
        }
    }
    parts.push(input.get(start..).unwrap_or_default());
    parts
}

/// Parse one complex selector such as `ul > li.item:nth-child(odd) a`.
///
/// # Errors
/// Returns `SelectorError::InvalidSelector` for unreadable text and
/// `SelectorError::InvalidNth` for a malformed `:nth-child()` argument.
/// The `+` combinator parses to `Axis::Sibling`, which registration rejects;
/// the general sibling combinator `~` is not read at all. A pseudo-element is
/// only accepted on the last compound.
pub fn parse_complex_selector(input: &str) -> Result<ComplexSelector, SelectorError> {
    let text = input.trim();
    let mut tokens = SelectorTokenizer::new(text);
    let mut selector = ComplexSelector::new(tokens.compound()?);
    loop {
        let saw_whitespace = tokens.skip_spaces();
        let axis = match tokens.peek() {
            None => break,
            Some(b'>') => Axis::Child,
            Some(b'+') => Axis::Sibling,
            Some(_) if saw_whitespace => Axis::Descendant,
            Some(_) => return Err(tokens.error()),
        };
        if selector.subject().pseudo_element.is_some() {
            return Err(tokens.error());
        }
        if axis != Axis::Descendant {
            tokens.bump();
            tokens.skip_spaces();
        }
        let compound = tokens.compound()?;
        selector = selector.then(axis, compound);
    }
    Ok(selector)
}
