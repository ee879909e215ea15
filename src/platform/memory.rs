use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::{InputHandler, Page, PageError};

/// `<tag attrs>text</tag>` with no nested elements
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][\w-]*)([^<>]*)>([^<]*)</([A-Za-z][\w-]*)>")
        .expect("element pattern is valid")
});

/// One attribute: name, then an optional double-quoted, single-quoted or
/// bare value. Scanning left to right consumes quoted values whole, so
/// `class=` inside another attribute's value is never read as a name.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'=<>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

/// Class tokens of the first `class` attribute; later duplicates are ignored
fn class_tokens(attrs: &str) -> Vec<String> {
    ATTR_RE
        .captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case("class"))
        .and_then(|c| c.get(2).or_else(|| c.get(3)).or_else(|| c.get(4)))
        .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Identity of one parsed element. A markup replacement mints new ids, so
/// handles from before the replacement no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

struct ElementNode {
    id: ElementId,
    tag: String,
    /// Attribute text between the tag name and `>`, kept verbatim
    attrs: String,
    classes: Vec<String>,
    text: String,
    editable: bool,
    handler: Option<InputHandler>,
}

enum Node {
    Text(String),
    Element(ElementNode),
}

/// In-memory [`Page`] holding one container
///
/// The container holds a flat fragment: text interleaved with simple
/// elements that contain only text. Anything else is kept as opaque text,
/// so serializing always returns exactly what was assigned. Editability is
/// tracked per element and is not written into the markup.
pub struct MemoryPage {
    container_id: String,
    /// Markup the page was served with; a reload returns to it
    source: String,
    nodes: Vec<Node>,
    next_id: u64,
    reloads: usize,
    has_container: bool,
}

impl fmt::Debug for MemoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPage")
            .field("container_id", &self.container_id)
            .field("markup", &self.render())
            .field("reloads", &self.reloads)
            .finish()
    }
}

impl MemoryPage {
    /// Page whose container `container_id` was served with `source`
    pub fn new(container_id: impl Into<String>, source: impl Into<String>) -> Self {
        let mut page = Self {
            container_id: container_id.into(),
            source: source.into(),
            nodes: Vec::new(),
            next_id: 0,
            reloads: 0,
            has_container: true,
        };
        let source = page.source.clone();
        page.nodes = page.parse(&source);
        page
    }

    /// Page with no container element at all
    pub fn without_container() -> Self {
        let mut page = Self::new("", "");
        page.has_container = false;
        page
    }

    /// Markup the page was originally served with
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of reloads requested so far
    pub fn reloads(&self) -> usize {
        self.reloads
    }

    /// Text content of an element, if the handle is still live
    pub fn text(&self, element: &ElementId) -> Option<&str> {
        self.find(element).map(|e| e.text.as_str())
    }

    /// Simulate the user typing into an element.
    ///
    /// Only editable elements accept input. Returns the element's input
    /// handler, for the caller to run once it no longer borrows the page
    /// (the handler reads the page back).
    pub fn user_edit(&mut self, element: &ElementId, text: &str) -> Option<InputHandler> {
        let node = self.find_mut(element)?;
        if !node.editable {
            return None;
        }
        node.text = text.to_string();
        node.handler.clone()
    }

    fn parse(&mut self, markup: &str) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut cursor = 0;
        for caps in ELEMENT_RE.captures_iter(markup) {
            let whole = &caps[0];
            let start = caps.get(0).map_or(cursor, |m| m.start());
            if start > cursor {
                nodes.push(Node::Text(markup[cursor..start].to_string()));
            }
            cursor = start + whole.len();

            if caps[1] != caps[4] {
                nodes.push(Node::Text(whole.to_string()));
                continue;
            }
            let attrs = caps[2].to_string();
            let classes = class_tokens(&attrs);
            self.next_id += 1;
            nodes.push(Node::Element(ElementNode {
                id: ElementId(self.next_id),
                tag: caps[1].to_string(),
                attrs,
                classes,
                text: caps[3].to_string(),
                editable: false,
                handler: None,
            }));
        }
        if cursor < markup.len() {
            nodes.push(Node::Text(markup[cursor..].to_string()));
        }
        nodes
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(e) => {
                    out.push('<');
                    out.push_str(&e.tag);
                    out.push_str(&e.attrs);
                    out.push('>');
                    out.push_str(&e.text);
                    out.push_str("</");
                    out.push_str(&e.tag);
                    out.push('>');
                }
            }
        }
        out
    }

    fn elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    fn find(&self, id: &ElementId) -> Option<&ElementNode> {
        self.elements().find(|e| e.id == *id)
    }

    fn find_mut(&mut self, id: &ElementId) -> Option<&mut ElementNode> {
        self.nodes.iter_mut().find_map(|n| match n {
            Node::Element(e) if e.id == *id => Some(e),
            _ => None,
        })
    }

    fn check_container(&self, container_id: &str) -> Result<(), PageError> {
        if self.has_container && container_id == self.container_id {
            Ok(())
        } else {
            Err(PageError::ContainerMissing(container_id.to_string()))
        }
    }
}

impl Page for MemoryPage {
    type Element = ElementId;

    fn container_markup(&self, container_id: &str) -> Result<String, PageError> {
        self.check_container(container_id)?;
        Ok(self.render())
    }

    fn replace_container_markup(
        &mut self,
        container_id: &str,
        markup: &str,
    ) -> Result<(), PageError> {
        self.check_container(container_id)?;
        self.nodes = self.parse(markup);
        Ok(())
    }

    fn query_marked(&self, marker_class: &str) -> Vec<ElementId> {
        self.elements()
            .filter(|e| e.classes.iter().any(|c| c == marker_class))
            .map(|e| e.id)
            .collect()
    }

    fn set_editable(&mut self, element: &ElementId) {
        if let Some(node) = self.find_mut(element) {
            node.editable = true;
        }
    }

    fn is_editable(&self, element: &ElementId) -> bool {
        self.find(element).is_some_and(|e| e.editable)
    }

    fn has_input_handler(&self, element: &ElementId) -> bool {
        self.find(element).is_some_and(|e| e.handler.is_some())
    }

    fn attach_input_handler(&mut self, element: &ElementId, handler: InputHandler) {
        if let Some(node) = self.find_mut(element) {
            node.handler = Some(handler);
        }
    }

    /// Discards all live state and re-serves the source markup
    fn reload(&mut self) {
        self.reloads += 1;
        let source = self.source.clone();
        self.nodes = self.parse(&source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_markup_is_preserved_verbatim() {
        let markup = "intro <p class=\"stateful\" data-x='1'>hello</p>\n<b>bold</b> <i>x</b> tail";
        let page = MemoryPage::new("state-zone", markup);
        assert_eq!(page.container_markup("state-zone").unwrap(), markup);
    }

    #[test]
    fn test_query_marked_matches_class_tokens() {
        let page = MemoryPage::new(
            "state-zone",
            r#"<p class="stateful">a</p><p class="statefulness">b</p><h1 class='big stateful'>c</h1><p>d</p>"#,
        );
        let marked = page.query_marked("stateful");
        assert_eq!(marked.len(), 2);
        assert_eq!(page.text(&marked[0]), Some("a"));
        assert_eq!(page.text(&marked[1]), Some("c"));
    }

    #[test]
    fn test_class_inside_other_attribute_value_is_ignored() {
        let page = MemoryPage::new(
            "state-zone",
            r#"<p title="x class='stateful'">a</p><p data-note='class="stateful"'>b</p><p title="t" class=stateful>c</p><p class="plain" class="stateful">d</p>"#,
        );
        let marked = page.query_marked("stateful");
        assert_eq!(marked.len(), 1);
        assert_eq!(page.text(&marked[0]), Some("c"));
    }

    #[test]
    fn test_replacement_invalidates_handles() {
        let mut page = MemoryPage::new("state-zone", r#"<p class="stateful">a</p>"#);
        let old = page.query_marked("stateful")[0];
        page.set_editable(&old);
        assert!(page.is_editable(&old));

        page.replace_container_markup("state-zone", r#"<p class="stateful">b</p>"#)
            .unwrap();
        assert!(!page.is_editable(&old));
        assert_eq!(page.text(&old), None);

        let new = page.query_marked("stateful")[0];
        assert_ne!(old, new);
        assert!(!page.is_editable(&new));
    }

    #[test]
    fn test_user_edit_requires_editable() {
        let mut page = MemoryPage::new("state-zone", r#"<p class="stateful">hello</p>"#);
        let el = page.query_marked("stateful")[0];
        assert!(page.user_edit(&el, "world").is_none());
        assert_eq!(page.text(&el), Some("hello"));

        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        page.set_editable(&el);
        page.attach_input_handler(&el, Rc::new(move || counter.set(counter.get() + 1)));
        let handler = page.user_edit(&el, "world").unwrap();
        handler();
        assert_eq!(fired.get(), 1);
        assert_eq!(
            page.container_markup("state-zone").unwrap(),
            r#"<p class="stateful">world</p>"#
        );
    }

    #[test]
    fn test_reload_serves_source() {
        let mut page = MemoryPage::new("state-zone", r#"<p class="stateful">hello</p>"#);
        page.replace_container_markup("state-zone", "<p>other</p>").unwrap();
        page.reload();
        assert_eq!(page.reloads(), 1);
        assert_eq!(page.container_markup("state-zone").unwrap(), page.source());
    }

    #[test]
    fn test_missing_container() {
        let page = MemoryPage::new("state-zone", "");
        assert_eq!(
            page.container_markup("elsewhere"),
            Err(PageError::ContainerMissing("elsewhere".to_string()))
        );
        let page = MemoryPage::without_container();
        assert!(page.container_markup("").is_err());
    }
}
