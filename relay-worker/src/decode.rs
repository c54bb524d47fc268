//! Email Decoder: MIME part tree to best-effort body text.
//!
//! Walks the Gmail payload tree depth-first and returns the concatenation of
//! all `text/plain` parts when any exist, otherwise the concatenation of all
//! `text/html` parts converted to text. Markup is stripped, whitespace runs
//! collapse to single spaces, and absolute anchor hrefs are kept inline after
//! their anchor text so the extractor can still anchor on job URLs.
//!
//! Decoding never fails: malformed base64 degrades to an empty part and
//! malformed UTF-8 decodes lossily.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ego_tree::NodeRef;
use scraper::{Html, Node};
use tracing::warn;

use crate::gmail::MessagePart;

/// Decode the best available human-readable body from a payload tree.
///
/// Returns the empty string when no decodable text part exists; the caller
/// treats that as "no jobs found", not an error.
pub fn decode_message_body(payload: &MessagePart) -> String {
    let mut plain = Vec::new();
    collect_parts(payload, "text/plain", &mut plain);
    if !plain.is_empty() {
        return plain.join("\n");
    }

    let mut html = Vec::new();
    collect_parts(payload, "text/html", &mut html);
    if !html.is_empty() {
        return html
            .iter()
            .map(|part| html_to_text(part))
            .collect::<Vec<_>>()
            .join("\n");
    }

    String::new()
}

/// Depth-first collection of decoded part bodies with the given MIME type.
fn collect_parts(part: &MessagePart, mime_type: &str, out: &mut Vec<String>) {
    if part.mime_type == mime_type {
        if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) {
            let text = decode_base64url(data);
            if !text.is_empty() {
                out.push(text);
            }
        }
    }

    for sub in &part.parts {
        collect_parts(sub, mime_type, out);
    }
}

/// Decode a base64url payload as the Gmail API encodes body data.
///
/// Gmail emits both padded and unpadded forms; padding is trimmed before
/// decoding. Failures degrade to an empty string and malformed UTF-8 is
/// replaced rather than rejected.
fn decode_base64url(data: &str) -> String {
    match URL_SAFE_NO_PAD.decode(data.trim_end_matches('=')) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(error = %e, data_length = data.len(), "body_decode_failed");
            String::new()
        }
    }
}

/// Convert an HTML body to plain text.
///
/// Block elements become line breaks, `script`/`style`/`head` content is
/// dropped, and `<a href>` targets are emitted after their anchor text.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    walk_node(document.tree.root(), &mut out);
    normalize_whitespace(&out)
}

fn walk_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let name = element.name();
            if matches!(name, "script" | "style" | "head" | "title") {
                return;
            }

            let block = is_block_element(name);
            if block {
                out.push('\n');
            }

            for child in node.children() {
                walk_node(child, out);
            }

            if name == "a" {
                if let Some(href) = element.attr("href") {
                    if href.starts_with("http://") || href.starts_with("https://") {
                        out.push(' ');
                        out.push_str(href);
                        out.push(' ');
                    }
                }
            } else if matches!(name, "td" | "th") {
                out.push(' ');
            }

            if block {
                out.push('\n');
            }
        }
        _ => {
            for child in node.children() {
                walk_node(child, out);
            }
        }
    }
}

fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "br"
            | "li"
            | "ul"
            | "ol"
            | "tr"
            | "table"
            | "hr"
            | "blockquote"
            | "section"
            | "header"
            | "footer"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
    )
}

/// Collapse horizontal whitespace runs and squeeze repeated blank lines.
fn normalize_whitespace(raw: &str) -> String {
    let mut lines = Vec::new();
    let mut last_blank = true;

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !last_blank {
                lines.push(String::new());
                last_blank = true;
            }
        } else {
            lines.push(collapsed);
            last_blank = false;
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::types::PartBody;

    fn encoded(text: &str) -> Option<PartBody> {
        Some(PartBody {
            data: Some(URL_SAFE_NO_PAD.encode(text.as_bytes())),
        })
    }

    fn part(mime_type: &str, body: Option<PartBody>, parts: Vec<MessagePart>) -> MessagePart {
        MessagePart {
            mime_type: mime_type.to_string(),
            headers: vec![],
            body,
            parts,
        }
    }

    #[test]
    fn test_prefers_plain_text_over_html() {
        let payload = part(
            "multipart/alternative",
            None,
            vec![
                part("text/plain", encoded("plain version"), vec![]),
                part("text/html", encoded("<b>html version</b>"), vec![]),
            ],
        );

        assert_eq!(decode_message_body(&payload), "plain version");
    }

    #[test]
    fn test_nested_multipart_recursion() {
        let payload = part(
            "multipart/mixed",
            None,
            vec![part(
                "multipart/alternative",
                None,
                vec![part("text/plain", encoded("nested text"), vec![])],
            )],
        );

        assert_eq!(decode_message_body(&payload), "nested text");
    }

    #[test]
    fn test_simple_message_body_in_payload() {
        let payload = part("text/plain", encoded("direct body"), vec![]);

        assert_eq!(decode_message_body(&payload), "direct body");
    }

    #[test]
    fn test_html_fallback_strips_markup() {
        let payload = part(
            "text/html",
            encoded("<html><body><p>Senior   Engineer</p><p>Acme &amp; Co</p></body></html>"),
            vec![],
        );

        let body = decode_message_body(&payload);

        assert!(!body.contains('<'));
        assert!(!body.contains('>'));
        assert!(body.contains("Senior Engineer"));
        assert!(body.contains("Acme & Co"));
        assert!(!body.contains("  "));
    }

    #[test]
    fn test_html_keeps_anchor_href_inline() {
        let payload = part(
            "text/html",
            encoded(
                "<div><a href=\"https://www.linkedin.com/comm/jobs/view/42?trk=x\">Staff Engineer</a></div>",
            ),
            vec![],
        );

        let body = decode_message_body(&payload);
        let title_pos = body.find("Staff Engineer").unwrap();
        let url_pos = body.find("https://www.linkedin.com/comm/jobs/view/42").unwrap();

        assert!(title_pos < url_pos);
    }

    #[test]
    fn test_html_drops_style_content() {
        let payload = part(
            "text/html",
            encoded("<html><head><style>.x{color:red}</style></head><body>visible</body></html>"),
            vec![],
        );

        let body = decode_message_body(&payload);

        assert!(body.contains("visible"));
        assert!(!body.contains("color"));
    }

    #[test]
    fn test_invalid_base64_degrades_to_empty() {
        let payload = part(
            "text/plain",
            Some(PartBody {
                data: Some("!!!not base64!!!".to_string()),
            }),
            vec![],
        );

        assert_eq!(decode_message_body(&payload), "");
    }

    #[test]
    fn test_padded_base64_accepted() {
        use base64::engine::general_purpose::URL_SAFE;

        let payload = part(
            "text/plain",
            Some(PartBody {
                data: Some(URL_SAFE.encode("padded body!")),
            }),
            vec![],
        );

        assert_eq!(decode_message_body(&payload), "padded body!");
    }

    #[test]
    fn test_no_text_parts_returns_empty() {
        let payload = part(
            "multipart/mixed",
            None,
            vec![part("image/png", None, vec![])],
        );

        assert_eq!(decode_message_body(&payload), "");
    }

    #[test]
    fn test_lossy_utf8_never_panics() {
        let payload = part(
            "text/plain",
            Some(PartBody {
                data: Some(URL_SAFE_NO_PAD.encode([0x66, 0xff, 0x6f])),
            }),
            vec![],
        );

        let body = decode_message_body(&payload);
        assert!(body.starts_with('f'));
        assert!(body.ends_with('o'));
    }
}
