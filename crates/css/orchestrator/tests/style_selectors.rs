#![cfg(test)]

mod common;

use common::{Dom, init_logging, sheet};
use core::error::Error;
use css_orchestrator::types::{MediaRule, StyleRule, Stylesheet};
use css_orchestrator::{
    CascadedStyle, Declaration, MediaEnvironment, Matcher, Origin, SelectorError,
    StylesheetFactory, create_ua_stylesheet,
};

/// Values of every declaration, lowest precedence first.
fn values(style: &CascadedStyle) -> Vec<&str> {
    style.iter().map(|decl| decl.value.as_str()).collect()
}

/// Winning value of `property`.
fn winner<'style>(style: &'style CascadedStyle, property: &str) -> Option<&'style str> {
    style.property(property).map(|decl| decl.value.as_str())
}

/// Matcher over `sheets` for the screen medium.
///
/// # Errors
/// Returns an error if the selector table cannot be built.
fn build_matcher(sheets: &[Stylesheet], dom: Dom) -> Result<Matcher<usize, Dom>, Box<dyn Error>> {
    init_logging();
    Ok(Matcher::from_stylesheets(sheets, &MediaEnvironment::default(), dom)?)
}

/// Test that type, class and id rules are ordered by specificity.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn warn_paragraph_orders_black_red_blue() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let html = dom.element(None, "html", &[]);
    let body = dom.element(Some(html), "body", &[]);
    let para = dom.element(Some(body), "p", &[("class", "warn"), ("id", "id1")]);
    let sheets = [sheet(
        Origin::Author,
        &[("p", "color: black"), (".warn", "color: red"), ("#id1", "color: blue")],
    )?];
    let matcher = build_matcher(&sheets, dom)?;
    let style = matcher.cascaded_style(None, para, false)?;
    assert_eq!(values(&style), vec!["black", "red", "blue"]);
    assert_eq!(winner(&style, "color"), Some("blue"));
    Ok(())
}

/// Test that `li:nth-child(even)` matches the second and fourth items only.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn nth_child_even_over_five_items() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let list = dom.element(None, "ul", &[]);
    let items: Vec<usize> = (0..5).map(|_| dom.element(Some(list), "li", &[])).collect();
    let sheets = [sheet(Origin::Author, &[("li:nth-child(even)", "color: red")])?];
    let matcher = build_matcher(&sheets, dom)?;
    let mut matched = Vec::new();
    for (position, item) in items.iter().enumerate() {
        if !matcher.cascaded_style(None, *item, false)?.is_empty() {
            matched.push(position);
        }
    }
    assert_eq!(matched, vec![1, 3]);
    Ok(())
}

/// Test that user-agent, author and inline declarations come out in that order.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn user_agent_author_then_inline() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let para = dom.element(None, "p", &[("style", "color: blue")]);
    let sheets = [
        sheet(Origin::UserAgent, &[("p", "color: gray")])?,
        sheet(Origin::Author, &[("p", "color: red"), ("p", "color: green")])?,
    ];
    let matcher = build_matcher(&sheets, dom)?;
    let style = matcher.cascaded_style(None, para, false)?;
    assert_eq!(values(&style), vec!["gray", "red", "green", "blue"]);
    Ok(())
}

/// Test that presentational hints rank below every author rule.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn presentational_hints_come_first() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let cell = dom.element(None, "td", &[]);
    dom.set_hint(cell, "color: purple; text-align: center");
    let sheets = [sheet(Origin::Author, &[("*", "color: red")])?];
    let matcher = build_matcher(&sheets, dom)?;
    let style = matcher.cascaded_style(None, cell, false)?;
    assert_eq!(values(&style), vec!["purple", "center", "red"]);
    assert_eq!(winner(&style, "text-align"), Some("center"));
    Ok(())
}

/// Test that one id outranks ten classes regardless of source order.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn one_id_beats_ten_classes() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let node = dom.element(None, "div", &[("class", "a b c d e f g h i j"), ("id", "x")]);
    let sheets = [sheet(
        Origin::Author,
        &[("#x", "color: blue"), (".a.b.c.d.e.f.g.h.i.j", "color: red")],
    )?];
    let matcher = build_matcher(&sheets, dom)?;
    let style = matcher.cascaded_style(None, node, false)?;
    assert_eq!(values(&style), vec!["red", "blue"]);
    Ok(())
}

/// Test that important user declarations beat important author declarations,
/// which in turn beat the `style` attribute.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn user_important_beats_author_important() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let para = dom.element(None, "p", &[("style", "color: blue")]);
    let sheets = [
        sheet(Origin::User, &[("p", "color: green !important")])?,
        sheet(Origin::Author, &[("#none, p", "color: red !important; margin: 0")])?,
    ];
    let matcher = build_matcher(&sheets, dom)?;
    let style = matcher.cascaded_style(None, para, false)?;
    assert_eq!(values(&style), vec!["0", "blue", "red", "green"]);
    assert_eq!(winner(&style, "color"), Some("green"));
    Ok(())
}

/// Test that `@media` blocks are kept only for a matching medium.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn media_rules_follow_the_medium() -> Result<(), Box<dyn Error>> {
    init_logging();
    let build = |medium: &str| -> Result<Matcher<usize, Dom>, Box<dyn Error>> {
        let mut dom = Dom::default();
        dom.element(None, "p", &[]);
        let print = MediaRule::new(["print"], vec![StyleRule::parse("p", "color: black")?]);
        let sheets = [Stylesheet::new(Origin::Author)
            .with_rule(StyleRule::parse("p", "color: red")?)
            .with_media(print)];
        Ok(Matcher::from_stylesheets(&sheets, &MediaEnvironment::new(medium), dom)?)
    };
    assert_eq!(values(&*build("screen")?.cascaded_style(None, 0, false)?), vec!["red"]);
    assert_eq!(values(&*build("PRINT")?.cascaded_style(None, 0, false)?), vec!["red", "black"]);
    Ok(())
}

/// Test that sibling combinators are refused when the table is built.
///
/// # Errors
/// Returns an error if the stylesheet cannot be parsed.
#[test]
fn sibling_combinator_is_rejected() -> Result<(), Box<dyn Error>> {
    init_logging();
    let sheets = [sheet(Origin::Author, &[("h1 + p", "color: red")])?];
    let Err(err) = Matcher::<usize, Dom>::from_stylesheets(&sheets, &MediaEnvironment::default(), Dom::default()) else {
        return Err("sibling selector was accepted".into());
    };
    assert_eq!(err.downcast_ref::<SelectorError>(), Some(&SelectorError::UnsupportedAxis));
    Ok(())
}

/// Test that pseudo-element rules stay out of the element's own style.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn pseudo_element_rules_are_isolated() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let body = dom.element(None, "body", &[]);
    let para = dom.element(Some(body), "p", &[]);
    let sheets = [sheet(
        Origin::Author,
        &[("p", "color: red"), ("p::before", "content: 'x'"), ("body p:after", "content: 'y'")],
    )?];
    let matcher = build_matcher(&sheets, dom)?;
    let style = matcher.cascaded_style(None, para, false)?;
    assert_eq!(values(&style), vec!["red"]);
    let before = matcher.pseudo_element_style(para, "before")?;
    assert_eq!(before.as_deref().map(values), Some(vec!["'x'"]));
    let after = matcher.pseudo_element_style(para, "after")?;
    assert_eq!(after.as_deref().map(values), Some(vec!["'y'"]));
    assert!(matcher.pseudo_element_style(para, "first-line")?.is_none());
    assert!(matcher.pseudo_element_style(body, "before")?.is_none());
    Ok(())
}

/// Test that a pseudo-element before the subject compound is refused.
///
/// # Errors
/// Returns an error if the selector is accepted.
#[test]
fn leading_pseudo_elements_are_refused() -> Result<(), Box<dyn Error>> {
    let Err(err) = sheet(Origin::Author, &[("p::before span", "color: red")]) else {
        return Err("pseudo-element before a combinator was accepted".into());
    };
    assert!(matches!(
        err.downcast_ref::<SelectorError>(),
        Some(SelectorError::InvalidSelector(_))
    ));
    Ok(())
}

/// Test that commas inside attribute values do not split a selector list.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn quoted_commas_stay_in_attribute_values() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let body = dom.element(None, "body", &[]);
    let link = dom.element(Some(body), "a", &[("title", "x,y")]);
    let other = dom.element(Some(body), "a", &[("title", "x")]);
    let sheets = [sheet(Origin::Author, &[(r#"a[title="x,y"], h1"#, "color: red")])?];
    let matcher = build_matcher(&sheets, dom)?;
    assert_eq!(winner(&*matcher.cascaded_style(None, link, false)?, "color"), Some("red"));
    assert!(matcher.cascaded_style(None, other, false)?.property("color").is_none());
    Ok(())
}

/// Test that `:visited` rules record the element and follow the host's history.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn visited_links_are_recorded() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let body = dom.element(None, "body", &[]);
    let link = dom.element(Some(body), "a", &[("href", "/next")]);
    let anchor = dom.element(Some(body), "a", &[]);
    let mut matcher = build_matcher(&[create_ua_stylesheet()], dom)?;

    let style = matcher.cascaded_style(None, link, false)?;
    assert_eq!(winner(&style, "color"), Some("#0000ee"));
    assert!(matcher.is_visited_styled(link));
    assert!(!matcher.is_visited_styled(anchor));
    assert!(matcher.cascaded_style(None, anchor, false)?.is_empty());
    assert!(!matcher.is_visited_styled(anchor));

    matcher.host_mut().set_visited(link, true);
    let restyled = matcher.cascaded_style(None, link, true)?;
    assert_eq!(winner(&restyled, "color"), Some("#551a8b"));
    Ok(())
}

/// Test that `:hover` consults the host and records the element.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn hover_state_comes_from_the_host() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let button = dom.element(None, "button", &[]);
    let sheets = [sheet(Origin::Author, &[("button:hover", "color: red")])?];
    let mut matcher = build_matcher(&sheets, dom)?;
    assert!(matcher.cascaded_style(None, button, false)?.is_empty());
    assert!(matcher.is_hover_styled(button));
    assert!(!matcher.is_focus_styled(button));
    assert!(!matcher.is_active_styled(button));

    matcher.host_mut().set_hover(button, true);
    assert_eq!(values(&*matcher.cascaded_style(None, button, true)?), vec!["red"]);
    Ok(())
}

/// Test that cached styles survive attribute changes until a restyle.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn restyle_after_attribute_change() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let body = dom.element(None, "body", &[]);
    let para = dom.element(Some(body), "p", &[]);
    let sheets = [sheet(Origin::Author, &[(".hot", "color: red")])?];
    let mut matcher = build_matcher(&sheets, dom)?;
    assert!(matcher.cascaded_style(None, para, false)?.is_empty());

    matcher.host_mut().set_attr(para, "class", "hot");
    assert!(matcher.cascaded_style(None, para, false)?.is_empty());
    assert_eq!(values(&*matcher.cascaded_style(None, para, true)?), vec!["red"]);
    assert_eq!(values(&*matcher.cascaded_style(None, para, false)?), vec!["red"]);
    Ok(())
}

/// Test that an evicted element is matched again on the next query.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn remove_style_evicts_the_cache_entry() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let para = dom.element(None, "p", &[]);
    let sheets = [sheet(Origin::Author, &[(".hot", "color: red")])?];
    let mut matcher = build_matcher(&sheets, dom)?;
    assert!(matcher.cascaded_style(None, para, false)?.is_empty());
    assert!(matcher.mapper_of(para).is_some());

    matcher.host_mut().set_attr(para, "class", "hot");
    assert!(matcher.remove_style(para));
    assert!(!matcher.remove_style(para));
    assert!(matcher.mapper_of(para).is_none());
    assert_eq!(values(&*matcher.cascaded_style(None, para, false)?), vec!["red"]);
    Ok(())
}

/// Test that restyling a subtree top-down picks up ancestor changes.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn restyle_subtree_reaches_descendants() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let body = dom.element(None, "body", &[]);
    let panel = dom.element(Some(body), "div", &[]);
    let para = dom.element(Some(panel), "p", &[]);
    let sheets = [sheet(Origin::Author, &[(".on > p", "color: red")])?];
    let mut matcher = build_matcher(&sheets, dom)?;
    assert!(matcher.cascaded_style(None, para, false)?.is_empty());

    matcher.host_mut().set_attr(panel, "class", "on");
    let styles = matcher.restyle_subtree(None, &[panel, para])?;
    assert_eq!(styles.len(), 2);
    assert!(styles.first().is_some_and(|style| style.is_empty()));
    assert_eq!(styles.last().map(|style| values(style)), Some(vec!["red"]));
    Ok(())
}

/// Records the base URI it was handed.
struct BaseUriFactory;

impl StylesheetFactory for BaseUriFactory {
    fn parse_style_declaration(&self, origin: Origin, text: &str, base_uri: Option<&str>) -> Vec<Declaration> {
        vec![Declaration::new(text, base_uri.unwrap_or("none")).with_origin(origin)]
    }
}

/// Test that inline text goes through the configured factory with the base URI.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn custom_factory_receives_base_uri() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let para = dom.element(None, "p", &[("style", "background")]);
    let matcher = build_matcher(&[], dom)?.with_factory(BaseUriFactory);
    let style = matcher.cascaded_style(Some("https://example.org/doc"), para, false)?;
    assert_eq!(winner(&style, "background"), Some("https://example.org/doc"));
    Ok(())
}

/// Test that the user-agent sheet hides metadata and sizes headings.
///
/// # Errors
/// Returns an error if the matcher cannot be built or styling fails.
#[test]
fn user_agent_defaults() -> Result<(), Box<dyn Error>> {
    let mut dom = Dom::default();
    let html = dom.element(None, "html", &[]);
    let head = dom.element(Some(html), "head", &[]);
    let body = dom.element(Some(html), "body", &[]);
    let heading = dom.element(Some(body), "h1", &[("style", "font-size: 3em")]);
    let checkbox = dom.element(Some(body), "input", &[("type", "checkbox")]);
    let matcher = build_matcher(&[create_ua_stylesheet()], dom)?;

    let head_style = matcher.cascaded_style(None, head, false)?;
    assert_eq!(winner(&head_style, "display"), Some("none"));
    let heading_style = matcher.cascaded_style(None, heading, false)?;
    assert_eq!(winner(&heading_style, "display"), Some("block"));
    assert_eq!(winner(&heading_style, "font-weight"), Some("700"));
    assert_eq!(winner(&heading_style, "font-size"), Some("3em"));
    assert!(heading_style.iter().any(|decl| decl.origin == Origin::UserAgent));
    let checkbox_style = matcher.cascaded_style(None, checkbox, false)?;
    assert_eq!(winner(&checkbox_style, "padding"), Some("0"));
    assert_eq!(winner(&checkbox_style, "display"), Some("inline-block"));
    Ok(())
}
