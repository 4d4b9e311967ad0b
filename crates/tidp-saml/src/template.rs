//! Deterministic XML templating.
//!
//! Every element the signing pipeline emits is produced by [`render`]: literal
//! segments are interleaved with values and the result is passed through
//! [`normalize`]. The digest is computed over this exact output, so two
//! renders of the same input must be byte-identical.
//!
//! Values come in two flavours. [`Value::Text`] is untrusted character data
//! and is XML-escaped before interpolation; [`Value::Fragment`] is markup
//! previously produced by [`render`] and is inserted verbatim, which is how
//! elements nest.
//!
//! Escaping emits only the references exclusive C14N would, so the rendered
//! bytes are their own canonical form: `&`, `<` and `>` in text content, and
//! `&`, `<` and `"` in attribute values. Apostrophes are never escaped.

use std::borrow::Cow;
use std::fmt;

use quick_xml::escape::{minimal_escape, partial_escape};

/// Immutable, whitespace-normalized XML produced by [`render`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XmlFragment(String);

impl XmlFragment {
    /// An empty fragment, used where an optional element is absent.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the markup as UTF-8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consumes the fragment, returning the markup.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns true if the fragment contains no markup.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for XmlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for XmlFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A value interpolated between template segments.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    /// Character data; escaped before insertion.
    Text(&'a str),
    /// Trusted markup; inserted as-is.
    Fragment(&'a XmlFragment),
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a XmlFragment> for Value<'a> {
    fn from(fragment: &'a XmlFragment) -> Self {
        Self::Fragment(fragment)
    }
}

/// Interleaves `segments` with `values` and normalizes the result.
///
/// `segments[i]` is followed by `values[i]`; a well-formed template has
/// exactly one more segment than values.
#[must_use]
pub fn render(segments: &[&str], values: &[Value<'_>]) -> XmlFragment {
    debug_assert_eq!(
        segments.len(),
        values.len() + 1,
        "template must have one more segment than values"
    );

    let mut raw = String::with_capacity(segments.iter().map(|s| s.len()).sum::<usize>() + 64);
    for (i, segment) in segments.iter().enumerate() {
        raw.push_str(segment);
        match values.get(i) {
            Some(Value::Text(text)) if segment.ends_with('"') => {
                raw.push_str(&escape_attribute(text));
            }
            Some(Value::Text(text)) => raw.push_str(&partial_escape(*text)),
            Some(Value::Fragment(fragment)) => raw.push_str(fragment.as_str()),
            None => {}
        }
    }

    XmlFragment(normalize(&raw))
}

/// Attribute values keep `>` and `'` literal, as C14N writes them.
fn escape_attribute(text: &str) -> Cow<'_, str> {
    let escaped = minimal_escape(text);
    if escaped.contains('"') {
        Cow::Owned(escaped.replace('"', "&quot;"))
    } else {
        escaped
    }
}

/// Normalizes whitespace in markup.
///
/// - every run of spaces, tabs, CRs and LFs collapses to one space
/// - whitespace touching `<` or `>` is removed
/// - leading and trailing whitespace is removed
///
/// Other Unicode whitespace (NBSP, ideographic space) is content and is
/// left alone. A literal `>` inside an attribute value still counts as a
/// tag boundary, so spaces around it are dropped.
///
/// The pass is idempotent.
#[must_use]
pub fn normalize(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut pending_space = false;

    for c in xml.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            pending_space = true;
            continue;
        }
        if pending_space {
            let after_tag = matches!(out.chars().last(), None | Some('<' | '>'));
            if !after_tag && c != '<' && c != '>' {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_trims() {
        let xml = "\n  <a  x=\"1\"\t y=\"2\" >\r\n   hello \n\n world   </a>  ";
        assert_eq!(normalize(xml), "<a x=\"1\" y=\"2\">hello world</a>");
    }

    #[test]
    fn normalize_removes_whitespace_between_tags() {
        assert_eq!(normalize("<a>\n  <b></b>\n</a>"), "<a><b></b></a>");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize("  <x>\t a  b\n</x> <y/>  ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_has_no_forbidden_whitespace() {
        let out = normalize("<r>\n\t<c  k=\"v\">  t  </c>\n</r>\n");
        assert!(!out.contains("  "));
        assert!(!out.contains('\n') && !out.contains('\t'));
        assert!(!out.contains(" <") && !out.contains("< "));
        assert!(!out.contains(" >") && !out.contains("> "));
        assert_eq!(out.trim(), out);
    }

    #[test]
    fn render_interleaves_values() {
        let out = render(&["<a id=\"", "\">", "</a>"], &["_1".into(), "text".into()]);
        assert_eq!(out.as_str(), "<a id=\"_1\">text</a>");
    }

    #[test]
    fn render_escapes_text_values() {
        let out = render(&["<v n=\"", "\">", "</v>"], &["a\"b".into(), "<b> & 'c'".into()]);
        assert_eq!(out.as_str(), "<v n=\"a&quot;b\">&lt;b&gt; &amp; 'c'</v>");
    }

    #[test]
    fn render_escapes_only_what_c14n_escapes() {
        let out = render(
            &["<v n=\"", "\">", "</v>"],
            &["O'Brien <&>".into(), "O'Brien says \"hi\"".into()],
        );
        assert_eq!(
            out.as_str(),
            "<v n=\"O'Brien &lt;&amp;>\">O'Brien says \"hi\"</v>"
        );
        assert!(!out.as_str().contains("&apos;"));
        assert!(!out.as_str().contains("&quot;"));
    }

    #[test]
    fn normalize_keeps_non_ascii_whitespace() {
        let name = "Jean\u{a0}Luc\u{3000}X";
        assert_eq!(normalize(&format!("<n> {name} </n>")), format!("<n>{name}</n>"));
        assert_eq!(normalize("<n>a \u{a0} b</n>"), "<n>a \u{a0} b</n>");
    }

    #[test]
    fn render_nests_fragments_verbatim() {
        let inner = render(&["<b>", "</b>"], &["x&y".into()]);
        let outer = render(&["<a>\n  ", "\n</a>"], &[(&inner).into()]);
        assert_eq!(outer.as_str(), "<a><b>x&amp;y</b></a>");
    }

    #[test]
    fn render_with_empty_fragment_leaves_no_trace() {
        let empty = XmlFragment::empty();
        let with_gap = render(&["<a>\n  ", "\n  <b></b></a>"], &[(&empty).into()]);
        let without = render(&["<a><b></b></a>"], &[]);
        assert_eq!(with_gap, without);
    }
}
