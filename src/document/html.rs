use scraper::{Html, Node};

/// Elements whose text never reaches the extracted document.
pub const STRIPPED_ELEMENTS: [&str; 7] = [
    "script", "style", "nav", "footer", "header", "meta", "noscript",
];

/// Extracts visible text from an HTML page and normalizes its whitespace.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut fragments: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let stripped = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(el) if STRIPPED_ELEMENTS.contains(&el.name()))
            });
            if !stripped {
                fragments.push(&**text);
            }
        }
    }

    normalize_whitespace(&fragments.join("\n"))
}

/// Trims every line, breaks lines apart at every double space (tabs and other
/// whitespace runs stay inside the fragment), drops empty fragments and rejoins with
/// single newlines.
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
