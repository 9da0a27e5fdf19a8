use scraper::{ElementRef, Node};

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Elements whose boundaries break a line of rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Rendered text of `element`, whitespace collapsed to single spaces.
///
/// Text nodes are concatenated as they appear, so inline markup inside a
/// word (`<b>jane</b>@realty.com`) does not split it. Block-level element
/// boundaries become spaces. Text inside `<script>`, `<style>` and
/// `<noscript>` is skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) if HIDDEN_ELEMENTS.contains(&e.name()) => {}
            Node::Element(e) => {
                let block = BLOCK_ELEMENTS.contains(&e.name());
                if block {
                    out.push(' ');
                }
                if let Some(child) = ElementRef::wrap(child) {
                    collect(child, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn fragment_text(html: &str) -> String {
        visible_text(Html::parse_fragment(html).root_element())
    }

    #[test]
    fn test_visible_text_skips_hidden_elements() {
        let html = Html::parse_document(
            r#"<html><head><style>p { color: red }</style></head>
               <body><p>Jane <b>Doe</b></p><script>track()</script>
               <noscript>enable js</noscript><p>Realtor</p></body></html>"#,
        );
        assert_eq!(visible_text(html.root_element()), "Jane Doe Realtor");
    }

    #[test]
    fn test_inline_markup_keeps_words_whole() {
        assert_eq!(
            fragment_text("<p>Contact <strong>jane</strong>@realty.com</p>"),
            "Contact jane@realty.com"
        );
        assert_eq!(fragment_text("<p>jdoe@<b>kw</b>.com</p>"), "jdoe@kw.com");
    }

    #[test]
    fn test_block_boundaries_separate_text() {
        assert_eq!(fragment_text("<div><p>Email</p>jane@doe.org</div>"), "Email jane@doe.org");
        assert_eq!(
            fragment_text("<ul><li>one@a.com</li><li>two@b.com</li></ul>"),
            "one@a.com two@b.com"
        );
        assert_eq!(fragment_text("line<br>next"), "line next");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(fragment_text("<span>  Jane\n\t Doe  </span>"), "Jane Doe");
    }
}
