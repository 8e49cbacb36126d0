//! HTML rendering of query results.
//!
//! All markup is built through [`Html`], which can only be created from
//! static markup or from text that has been escaped, so a value from the
//! endpoint can never be spliced into the page unescaped.

use std::fmt;

use crate::results::{triples, GraphResult, ResultSet, TabularResult};

/// Prefix that marks a value as a link target. `https://` is
/// not matched.
const LINK_PREFIX: &str = "http://";

/// A fragment of HTML that is safe to embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Html(String);

impl Html {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps literal markup written in this crate.
    pub fn markup(markup: &'static str) -> Self {
        Self(markup.to_string())
    }

    /// Escapes `text` so it renders literally.
    pub fn text(text: &str) -> Self {
        Self(escape(text))
    }

    /// Appends literal markup.
    pub fn push_markup(&mut self, markup: &'static str) {
        self.0.push_str(markup);
    }

    /// Appends another fragment.
    pub fn push(&mut self, fragment: &Html) {
        self.0.push_str(&fragment.0);
    }

    /// Returns the markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fragment, returning the markup.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turns `value` into a link if it starts with `http://`, otherwise escapes it.
pub fn linkify(value: &str) -> Html {
    if value.starts_with(LINK_PREFIX) {
        let escaped = escape(value);
        Html(format!("<a href=\"{escaped}\">{escaped}</a>"))
    } else {
        Html::text(value)
    }
}

/// Renders a result as a single `<table>` element.
pub fn render_table(result: &ResultSet) -> Html {
    let mut html = Html::markup("<table border=\"1\">");
    match result {
        ResultSet::Tabular(table) => render_tabular(table, &mut html),
        ResultSet::Graph(graph) => render_graph(graph, &mut html),
    }
    html.push_markup("</table>");
    html
}

/// Header row of variable names, then one body row per binding.
fn render_tabular(table: &TabularResult, html: &mut Html) {
    html.push_markup("<thead><tr>");
    for var in table.vars() {
        html.push_markup("<th> ");
        html.push(&Html::text(var));
        html.push_markup(" </th>");
    }
    html.push_markup("</tr></thead><tbody>");

    for row in table.rows() {
        html.push_markup("<tr>");
        for var in table.vars() {
            let value = row.get(var).map_or("", |term| term.value_str());
            push_cell(html, value);
        }
        html.push_markup("</tr>");
    }
    html.push_markup("</tbody>");
}

/// One row per triple, no header.
fn render_graph(graph: &GraphResult, html: &mut Html) {
    for (subject, predicate, object) in triples(graph) {
        html.push_markup("<tr>");
        push_cell(html, subject);
        push_cell(html, predicate);
        push_cell(html, object.value_str());
        html.push_markup("</tr>");
    }
}

fn push_cell(html: &mut Html, value: &str) {
    html.push_markup("<td>");
    html.push(&linkify(value));
    html.push_markup("</td>");
}

/// Wraps a result table in a minimal HTML document.
pub fn render_document(result: &ResultSet) -> Html {
    let mut html = Html::markup("<html><body>");
    html.push(&render_table(result));
    html.push_markup("</body></html>");
    html
}
