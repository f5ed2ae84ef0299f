//! Indented HTML serialization.
//!
//! Each tag and each non-blank text node goes on its own line, indented one
//! space per level. Whitespace-sensitive elements keep their contents as-is.

use scraper::{ElementRef, Node};

/// Optional replacement for an attribute value, asked per (element, attribute name)
pub type AttrValue<'f> = &'f dyn Fn(ElementRef<'_>, &str) -> Option<String>;

const INDENT: &str = " ";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const PRESERVE_WHITESPACE: &[&str] = &["pre", "listing", "textarea", "script", "style"];

// The parser drops one newline right after these opening tags
const LEADING_NEWLINE: &[&str] = &["pre", "listing", "textarea"];

const RAW_TEXT: &[&str] = &["script", "style"];

/// Serialize `root` and its subtree, leaving attributes untouched
#[cfg(test)]
pub fn prettify(root: ElementRef<'_>) -> String {
    prettify_with(root, &|_, _| None)
}

/// Serialize `root`, substituting attribute values where `attr_value` returns one
pub fn prettify_with(root: ElementRef<'_>, attr_value: AttrValue<'_>) -> String {
    let mut printer = Printer {
        out: String::new(),
        attr_value,
    };
    printer.pretty(root, 0);
    printer.out
}

struct Printer<'f> {
    out: String,
    attr_value: AttrValue<'f>,
}

impl Printer<'_> {
    fn pretty(&mut self, element: ElementRef<'_>, depth: usize) {
        let name = element.value().name();

        self.indent(depth);
        self.open_tag(element);

        if VOID_ELEMENTS.contains(&name) {
            self.out.push('\n');
            return;
        }

        if PRESERVE_WHITESPACE.contains(&name) {
            self.leading_newline(element);
            self.compact_children(element, RAW_TEXT.contains(&name));
            self.close_tag(name);
            self.out.push('\n');
            return;
        }

        self.out.push('\n');

        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        self.indent(depth + 1);
                        self.out.push_str(&escape_text(text));
                        self.out.push('\n');
                    }
                }
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.pretty(child, depth + 1);
                    }
                }
                Node::Comment(comment) => {
                    self.indent(depth + 1);
                    self.comment(comment);
                    self.out.push('\n');
                }
                _ => {}
            }
        }

        self.indent(depth);
        self.close_tag(name);
        self.out.push('\n');
    }

    fn compact(&mut self, element: ElementRef<'_>, raw: bool) {
        let name = element.value().name();
        self.open_tag(element);

        if VOID_ELEMENTS.contains(&name) {
            return;
        }

        self.leading_newline(element);
        self.compact_children(element, raw || RAW_TEXT.contains(&name));
        self.close_tag(name);
    }

    fn leading_newline(&mut self, element: ElementRef<'_>) {
        if !LEADING_NEWLINE.contains(&element.value().name()) {
            return;
        }

        let starts_with_newline = element
            .first_child()
            .map_or(false, |child| matches!(child.value(), Node::Text(text) if text.starts_with('\n')));
        if starts_with_newline {
            self.out.push('\n');
        }
    }

    fn compact_children(&mut self, element: ElementRef<'_>, raw: bool) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) if raw => self.out.push_str(text),
                Node::Text(text) => self.out.push_str(&escape_text(text)),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.compact(child, raw);
                    }
                }
                Node::Comment(comment) => self.comment(comment),
                _ => {}
            }
        }
    }

    fn open_tag(&mut self, element: ElementRef<'_>) {
        let value = element.value();

        self.out.push('<');
        self.out.push_str(value.name());
        for (name, original) in value.attrs() {
            let replaced = (self.attr_value)(element, name);
            let attr = replaced.as_deref().unwrap_or(original);

            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attr(attr));
            self.out.push('"');
        }

        if VOID_ELEMENTS.contains(&value.name()) {
            self.out.push_str("/>");
        } else {
            self.out.push('>');
        }
    }

    fn close_tag(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn comment(&mut self, comment: &str) {
        self.out.push_str("<!--");
        self.out.push_str(comment);
        self.out.push_str("-->");
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
