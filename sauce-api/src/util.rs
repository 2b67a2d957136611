use scraper::{ElementRef, Html, Selector};

use crate::error::{LayoutError, Result};
use crate::links::LinkMap;
use crate::portal::Portal;

/// Visible text of an element with surrounding whitespace removed.
pub fn text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// Text held directly by an element, ignoring anything inside its child elements.
pub fn own_text(el: ElementRef) -> String {
    el.children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
        .trim()
        .to_owned()
}

/// The first element after `anchor` in document order (including `anchor`'s own descendants)
/// that matches `selector`.
pub fn following<'a>(
    document: &'a Html,
    anchor: ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| selector.matches(el))
}

pub fn href<'a>(link: ElementRef<'a>, element: &'static str) -> Result<&'a str, LayoutError> {
    link.value()
        .attr("href")
        .ok_or(LayoutError::MissingAttribute {
            element,
            attribute: "href",
        })
}

/// Builds a label to URL map from links, labelling each with `label` applied to its text.
pub fn link_map<'a>(
    links: impl IntoIterator<Item = ElementRef<'a>>,
    portal: &Portal,
    label: impl Fn(&str) -> &str,
) -> Result<LinkMap> {
    links
        .into_iter()
        .map(|link| {
            let url = portal.resolve(href(link, "a")?)?;
            let text = text(link);
            Ok((label(&text).trim().to_owned(), url))
        })
        .collect()
}
