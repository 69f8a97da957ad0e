use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{QueryError, QueryResult};

/// Elements whose text never belongs to the readable page.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];

/// Elements that break the flow of text. Inline elements (`b`, `a`, `span`)
/// join their neighbours without a gap.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "div", "dl",
    "dt", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Rows of an encyclopedia infobox, the structured summary beside an article.
const INFOBOX_ROWS: &str = "table.infobox.vcard tr";

/// Reduces fetched markup to the plain text the extraction pipeline reads.
///
/// When the page carries an infobox with a founder row, each listed founder
/// is emitted first as a `Founded by <name>.` sentence and the table itself
/// is left out of the running text.
pub struct HtmlReducer {
    footnotes: Regex,
    infobox_rows: Selector,
    row_label: Selector,
    row_data: Selector,
}

impl HtmlReducer {
    pub fn new() -> QueryResult<Self> {
        Ok(Self {
            // Reference markers glue onto names ("Larry Page[1]") once brackets are stripped
            footnotes: Regex::new(r"\[(?:\d+|[a-z]|citation needed|note \d+)\]")?,
            infobox_rows: parse_selector(INFOBOX_ROWS)?,
            row_label: parse_selector("th")?,
            row_data: parse_selector("td")?,
        })
    }

    /// Extract visible text from `html`.
    ///
    /// When `required_selector` is given, a page without a matching element
    /// is reported as [`QueryError::ElementNotFound`].
    pub fn reduce(&self, html: &str, required_selector: Option<&str>) -> QueryResult<String> {
        let document = Html::parse_document(html);

        if let Some(selector) = required_selector {
            let parsed = parse_selector(selector)?;
            if document.select(&parsed).next().is_none() {
                return Err(QueryError::ElementNotFound(selector.to_string()));
            }
        }

        let mut text = String::with_capacity(html.len() / 4);
        let mut infoboxes = Vec::new();

        for name in self.infobox_founders(&document, &mut infoboxes) {
            text.push_str("Founded by ");
            text.push_str(&name);
            text.push_str(". ");
        }

        text.push_str(&visible_text(document.root_element(), ' ', &infoboxes));

        Ok(self.footnotes.replace_all(&text, "").into_owned())
    }

    /// Names listed in infobox founder rows, in page order. Tables that held
    /// such a row are pushed onto `tables`.
    fn infobox_founders<'a>(
        &self,
        document: &'a Html,
        tables: &mut Vec<ElementRef<'a>>,
    ) -> Vec<String> {
        let mut names = Vec::new();

        for row in document.select(&self.infobox_rows) {
            let label = row
                .select(&self.row_label)
                .next()
                .map_or_else(|| row.text().collect::<String>(), |th| th.text().collect());
            if !label.to_lowercase().contains("founder") {
                continue;
            }
            let Some(data) = row.select(&self.row_data).next() else {
                continue;
            };

            let listed = visible_text(data, '\n', &[]);
            names.extend(
                listed
                    .split(['\n', ',', ';'])
                    .map(|piece| self.footnotes.replace_all(piece, "").trim().to_string())
                    .filter(|piece| piece.chars().any(char::is_alphabetic)),
            );

            let table = row
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "table");
            if let Some(table) = table.filter(|t| !tables.contains(t)) {
                tables.push(table);
            }
        }

        names
    }
}

fn parse_selector(selector: &str) -> QueryResult<Selector> {
    Selector::parse(selector).map_err(|e| QueryError::InvalidSelector(format!("{selector}: {e:?}")))
}

enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Break,
}

/// Text under `root`, with `separator` around block elements.
///
/// Walks with an explicit stack, so nesting depth is bounded by memory
/// rather than the call stack.
fn visible_text<'a>(
    root: ElementRef<'a>,
    separator: char,
    excluded: &[ElementRef<'a>],
) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Enter(root)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => out.push_str(text),
            Step::Break => out.push(separator),
            Step::Enter(element) => {
                let name = element.value().name();
                if SKIPPED_ELEMENTS.contains(&name) || excluded.contains(&element) {
                    continue;
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    out.push(separator);
                    stack.push(Step::Break);
                }

                let children: Vec<_> = element.children().collect();
                for child in children.into_iter().rev() {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        stack.push(Step::Enter(child_element));
                    } else if let Some(text) = child.value().as_text() {
                        stack.push(Step::Text(text));
                    }
                }
            }
        }
    }

    out
}
