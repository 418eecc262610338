//! Ordered rule table for the markdown subset.
//!
//! Each rule is a regular expression and a replacement applied once, in
//! table order, to the output of the previous rule. Two orderings are
//! load-bearing:
//!
//! - bold runs before italic, because `**` is made of `*` characters and an
//!   italic pass first would split every bold pair;
//! - link runs before image, and skips matches that start with `!`, because
//!   the image marker is the link marker prefixed with `!`.
//!
//! Every capture is non-greedy and none spans a newline. Nested or
//! overlapping markers get whatever that matching yields.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Identity of one rendering rule, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// `**text**` to a strong span.
    Bold,
    /// `*text*` to an emphasis span.
    Italic,
    /// `~~text~~` to a deleted-text span.
    Strikethrough,
    /// `[label](url)` to an anchor opening in a new browsing context.
    Link,
    /// `![alt](url)` to an image.
    Image,
    /// A line starting with `• ` to a list item.
    ///
    /// The first line of the text counts too; a preceding newline is not
    /// required.
    BulletItem,
    /// A line starting with digits, `.` and a space to a list item,
    /// including the first line of the text.
    NumberedItem,
    /// The first contiguous run of list items to an unordered list.
    ListWrap,
    /// Remaining newlines to explicit line breaks.
    LineBreak,
}

impl RuleKind {
    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::Link => "link",
            Self::Image => "image",
            Self::BulletItem => "bullet_item",
            Self::NumberedItem => "numbered_item",
            Self::ListWrap => "list_wrap",
            Self::LineBreak => "line_break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    All,
    FirstOnly,
}

#[derive(Debug, Clone, Copy)]
enum Replacement {
    Template(&'static str),
    /// Expand the template unless capture 1 matched a `!`.
    TemplateUnlessBang(&'static str),
}

/// One compiled rendering rule.
#[derive(Debug)]
pub struct Rule {
    kind: RuleKind,
    regex: Regex,
    scope: Scope,
    replacement: Replacement,
}

impl Rule {
    fn compile(kind: RuleKind, pattern: &str, scope: Scope, replacement: Replacement) -> Self {
        let regex = Regex::new(pattern).unwrap_or_else(|error| {
            panic!("{} rule regex failed to compile: {error}", kind.name())
        });
        Self {
            kind,
            regex,
            scope,
            replacement,
        }
    }

    /// Which rule this is.
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Source of the matcher.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether only the first match is replaced.
    #[must_use]
    pub fn is_single_shot(&self) -> bool {
        self.scope == Scope::FirstOnly
    }

    /// Apply this rule to `input`.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        match (self.replacement, self.scope) {
            (Replacement::Template(template), Scope::All) => {
                self.regex.replace_all(input, template).into_owned()
            }
            (Replacement::Template(template), Scope::FirstOnly) => {
                self.regex.replace(input, template).into_owned()
            }
            (Replacement::TemplateUnlessBang(template), _) => self
                .regex
                .replace_all(input, |caps: &Captures<'_>| expand_unless_bang(caps, template))
                .into_owned(),
        }
    }
}

fn expand_unless_bang(caps: &Captures<'_>, template: &str) -> String {
    let whole = caps.get(0).map_or("", |m| m.as_str());
    let bang = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    if bang {
        return whole.to_owned();
    }
    let mut out = String::with_capacity(whole.len() + template.len());
    caps.expand(template, &mut out);
    out
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

/// The rendering pipeline, in application order.
#[must_use]
pub fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        use Replacement::{Template, TemplateUnlessBang};
        use Scope::{All, FirstOnly};

        vec![
            Rule::compile(
                RuleKind::Bold,
                r"\*\*(.*?)\*\*",
                All,
                Template("<strong>${1}</strong>"),
            ),
            Rule::compile(RuleKind::Italic, r"\*(.*?)\*", All, Template("<em>${1}</em>")),
            Rule::compile(
                RuleKind::Strikethrough,
                r"~~(.*?)~~",
                All,
                Template("<del>${1}</del>"),
            ),
            Rule::compile(
                RuleKind::Link,
                r"(!?)\[(.*?)\]\((.*?)\)",
                All,
                TemplateUnlessBang(
                    r#"<a href="${3}" target="_blank" rel="noopener noreferrer">${2}</a>"#,
                ),
            ),
            Rule::compile(
                RuleKind::Image,
                r"!\[(.*?)\]\((.*?)\)",
                All,
                Template(r#"<img src="${2}" alt="${1}" />"#),
            ),
            // The preceding newline is consumed so adjacent list lines form
            // one contiguous run of items for the wrap rule.
            Rule::compile(
                RuleKind::BulletItem,
                r"(?:^|\n)• ([^\n]*)",
                All,
                Template("<li>${1}</li>"),
            ),
            Rule::compile(
                RuleKind::NumberedItem,
                r"(?:^|\n)[0-9]+\. ([^\n]*)",
                All,
                Template("<li>${1}</li>"),
            ),
            Rule::compile(
                RuleKind::ListWrap,
                r"(?:<li>.*?</li>)+",
                FirstOnly,
                Template("<ul>${0}</ul>"),
            ),
            Rule::compile(RuleKind::LineBreak, r"\n", All, Template("<br />")),
        ]
    })
}

/// Render authored text to an HTML fragment.
///
/// Unmatched or malformed markers pass through literally; the function
/// never fails. Only the first contiguous list is wrapped in `ul`.
///
/// # Examples
/// ```
/// use markdown_subset::render;
///
/// assert_eq!(render(""), "");
/// assert_eq!(render("plain\ntext"), "plain<br />text");
/// assert_eq!(render("~~old~~ *new*"), "<del>old</del> <em>new</em>");
/// ```
#[must_use]
pub fn render(text: &str) -> String {
    rules()
        .iter()
        .fold(text.to_owned(), |acc, rule| rule.apply(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pipeline_order_is_fixed() {
        let order: Vec<RuleKind> = rules().iter().map(Rule::kind).collect();
        assert_eq!(
            order,
            vec![
                RuleKind::Bold,
                RuleKind::Italic,
                RuleKind::Strikethrough,
                RuleKind::Link,
                RuleKind::Image,
                RuleKind::BulletItem,
                RuleKind::NumberedItem,
                RuleKind::ListWrap,
                RuleKind::LineBreak,
            ]
        );
    }

    #[rstest]
    fn only_list_wrap_is_single_shot() {
        let single: Vec<RuleKind> = rules()
            .iter()
            .filter(|rule| rule.is_single_shot())
            .map(Rule::kind)
            .collect();
        assert_eq!(single, vec![RuleKind::ListWrap]);
    }

    #[rstest]
    #[case("", "")]
    #[case("no markers here", "no markers here")]
    #[case("a\nb\n", "a<br />b<br />")]
    #[case("price: 3 * 4", "price: 3 * 4")]
    fn marker_free_text_only_gains_line_breaks(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render(input), expected);
    }

    #[rstest]
    fn bold_leaves_no_italic_remnant() {
        let html = render("**x**");
        assert_eq!(html, "<strong>x</strong>");
        assert!(!html.contains("<em>"));
    }

    #[rstest]
    fn italic_wraps_single_stars() {
        assert_eq!(render("*x*"), "<em>x</em>");
    }

    #[rstest]
    fn captures_are_non_greedy() {
        assert_eq!(
            render("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[rstest]
    fn markers_do_not_span_lines() {
        assert_eq!(render("*open\nclose*"), "*open<br />close*");
    }

    #[rstest]
    fn link_becomes_anchor() {
        assert_eq!(
            render("[a](http://b)"),
            r#"<a href="http://b" target="_blank" rel="noopener noreferrer">a</a>"#
        );
    }

    #[rstest]
    fn image_is_not_swallowed_by_link_rule() {
        let html = render("![a](http://b)");
        assert_eq!(html, r#"<img src="http://b" alt="a" />"#);
        assert!(!html.contains("<a "));
    }

    #[rstest]
    fn link_and_image_on_one_line() {
        assert_eq!(
            render("see [x](u) ![y](v)"),
            r#"see <a href="u" target="_blank" rel="noopener noreferrer">x</a> <img src="v" alt="y" />"#
        );
    }

    #[rstest]
    fn unmatched_delimiters_pass_through() {
        assert_eq!(render("~~open [label](x"), "~~open [label](x");
    }

    #[rstest]
    fn numbered_lines_form_one_list() {
        assert_eq!(
            render("Steps:\n1. clone\n2. build"),
            "Steps:<ul><li>clone</li><li>build</li></ul>"
        );
    }

    #[rstest]
    fn bullet_then_numbered_lines_share_one_list() {
        assert_eq!(render("• a\n1. b"), "<ul><li>a</li><li>b</li></ul>");
    }

    #[rstest]
    fn lone_double_star_reads_as_empty_emphasis() {
        assert_eq!(render("**open"), "<em></em>open");
    }

    #[rstest]
    fn only_first_list_is_wrapped() {
        assert_eq!(
            render("• a\n• b\nbetween\n• c"),
            "<ul><li>a</li><li>b</li></ul><br />between<li>c</li>"
        );
    }

    #[rstest]
    fn list_line_at_start_of_text_matches() {
        assert_eq!(render("• only"), "<ul><li>only</li></ul>");
    }
}
