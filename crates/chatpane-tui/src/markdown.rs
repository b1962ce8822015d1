//! Markdown (with math) to styled terminal lines
//!
//! Output lines are unwrapped; the transcript wraps them to the bubble width.

use std::ops::Range;
use std::sync::OnceLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::{Captures, Regex};

use crate::math;

const RULE_WIDTH: usize = 24;

fn code_style() -> Style {
    Style::default().fg(Color::LightYellow)
}

fn math_style() -> Style {
    Style::default().fg(Color::LightMagenta).add_modifier(Modifier::ITALIC)
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    if level == HeadingLevel::H1 {
        style.add_modifier(Modifier::UNDERLINED)
    } else {
        style
    }
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_MATH);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Byte ranges of inline code spans and code blocks, in source order
fn code_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for (event, range) in Parser::new_ext(text, parser_options()).into_offset_iter() {
        let is_code = matches!(event, Event::Code(_) | Event::Start(Tag::CodeBlock(_)));
        // Events inside a code block fall within its range already
        let covered = ranges.last().is_some_and(|last| range.end <= last.end);
        if is_code && !covered {
            ranges.push(range);
        }
    }
    ranges
}

/// Rewrite `\( .. \)` and `\[ .. \]` into the dollar delimiters the parser
/// knows. Code spans and code blocks are copied through untouched.
fn normalize_math_delimiters(text: &str) -> String {
    static DISPLAY: OnceLock<Regex> = OnceLock::new();
    static INLINE: OnceLock<Regex> = OnceLock::new();

    let display = DISPLAY.get_or_init(|| Regex::new(r"(?s)\\\[(.+?)\\\]").expect("valid regex"));
    let inline = INLINE.get_or_init(|| Regex::new(r"\\\((.+?)\\\)").expect("valid regex"));

    let rewrite = |segment: &str| -> String {
        let segment = display.replace_all(segment, |caps: &Captures| format!("$${}$$", caps[1].trim()));
        inline
            .replace_all(&segment, |caps: &Captures| format!("${}$", caps[1].trim()))
            .into_owned()
    };

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for range in code_ranges(text) {
        if range.start < pos {
            continue;
        }
        out.push_str(&rewrite(&text[pos..range.start]));
        out.push_str(&text[range.clone()]);
        pos = range.end;
    }
    out.push_str(&rewrite(&text[pos..]));
    out
}

struct Renderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    // One entry per open list: next ordinal for ordered lists
    lists: Vec<Option<u64>>,
    // Open block quotes; each adds one bar to the left of every line
    quotes: Vec<TagEnd>,
    quote_opened: bool,
    in_code_block: bool,
    at_item_start: bool,
    link: Option<(String, String)>,
}

impl Renderer {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quotes: Vec::new(),
            quote_opened: false,
            in_code_block: false,
            at_item_start: false,
            link: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.at_item_start = false;
        if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(text);
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn push_line(&mut self, mut spans: Vec<Span<'static>>) {
        if !self.quotes.is_empty() {
            let bars = Span::styled("│ ".repeat(self.quotes.len()), Style::default().fg(Color::DarkGray));
            spans.insert(0, bars);
        }
        self.lines.push(Line::from(spans));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.push_line(spans);
        }
    }

    /// Start a top-level block, separated from the previous one by a blank line.
    /// The first block inside a fresh quote sits directly under its opener.
    fn start_block(&mut self) {
        self.flush();
        if std::mem::take(&mut self.quote_opened) {
            return;
        }
        if !self.lines.is_empty() && self.lists.is_empty() {
            self.push_line(Vec::new());
        }
    }

    fn item_prefix(&mut self) -> String {
        let depth = self.lists.len().saturating_sub(1);
        let indent = "  ".repeat(depth);
        match self.lists.last_mut() {
            Some(Some(n)) => {
                let prefix = format!("{}{}. ", indent, n);
                *n += 1;
                prefix
            }
            _ => format!("{}• ", indent),
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    let style = code_style();
                    for line in text.lines() {
                        self.current.push(Span::styled(format!("  {}", line), style));
                        self.flush();
                    }
                } else {
                    let style = self.style();
                    self.push_text(&text, style);
                }
            }
            Event::Code(code) => {
                let style = self.style().patch(code_style());
                self.push_text(&code, style);
            }
            Event::InlineMath(latex) => {
                let rendered = math::to_unicode(&latex).replace('\n', " ");
                let style = self.style().patch(math_style());
                self.push_text(&rendered, style);
            }
            Event::DisplayMath(latex) => {
                self.flush();
                for line in math::to_unicode(&latex).lines() {
                    self.push_line(vec![Span::styled(format!("  {}", line.trim()), math_style())]);
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = self.style();
                self.push_text(html.trim_end_matches('\n'), style);
            }
            Event::SoftBreak => {
                let style = self.style();
                self.push_text(" ", style);
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.start_block();
                self.push_line(vec![Span::styled(
                    "─".repeat(RULE_WIDTH),
                    Style::default().fg(Color::DarkGray),
                )]);
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_text(marker, Style::default().fg(Color::DarkGray));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::BlockQuote(..) => {
                self.start_block();
                self.quotes.push(tag.to_end());
                self.quote_opened = true;
            }
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.start_block();
                } else if !self.at_item_start {
                    self.flush();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.push_style(heading_style(level));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.push_line(vec![Span::styled(
                            lang.to_string(),
                            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                        )]);
                    }
                }
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let prefix = self.item_prefix();
                self.current.push(Span::raw(prefix));
                self.at_item_start = true;
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.push_style(
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::UNDERLINED),
                );
                self.link = Some((dest_url.to_string(), String::new()));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        if self.quotes.last() == Some(&tag) {
            self.flush();
            self.quotes.pop();
            self.quote_opened = false;
            return;
        }
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.flush();
                }
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.flush();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some((url, text)) = self.link.take() {
                    // Autolinks already show the URL as their text
                    if !url.is_empty() && url != text {
                        self.current.push(Span::styled(
                            format!(" ({})", url),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}

/// Render message content into styled lines. Never fails; an empty string
/// yields a single empty line.
pub fn render(content: &str) -> Vec<Line<'static>> {
    let source = normalize_math_delimiters(content);

    let mut renderer = Renderer::new();
    for event in Parser::new_ext(&source, parser_options()) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_empty_content() {
        let lines = render("");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].width(), 0);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain(&render("Hello world")), vec!["Hello world"]);
    }

    #[test]
    fn test_bold_and_italic() {
        let lines = render("**bold** and *it*");
        assert_eq!(lines.len(), 1);
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "bold");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[1].content, " and ");
        assert_eq!(spans[2].content, "it");
        assert!(spans[2].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        assert_eq!(plain(&render("one\n\ntwo")), vec!["one", "", "two"]);
    }

    #[test]
    fn test_soft_break_joins_lines() {
        assert_eq!(plain(&render("one\ntwo")), vec!["one two"]);
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(plain(&render("- a\n- b")), vec!["• a", "• b"]);
    }

    #[test]
    fn test_ordered_list_numbers() {
        assert_eq!(plain(&render("3. x\n4. y")), vec!["3. x", "4. y"]);
    }

    #[test]
    fn test_nested_list_indents() {
        assert_eq!(
            plain(&render("- a\n  - b\n- c")),
            vec!["• a", "  • b", "• c"]
        );
    }

    #[test]
    fn test_task_list() {
        assert_eq!(plain(&render("- [x] done\n- [ ] todo")), vec!["• [x] done", "• [ ] todo"]);
    }

    #[test]
    fn test_code_block() {
        let lines = render("```rust\nfn main() {}\n```");
        assert_eq!(plain(&lines), vec!["rust", "  fn main() {}"]);
    }

    #[test]
    fn test_inline_code_styled() {
        let lines = render("run `cargo`");
        let code = &lines[0].spans[1];
        assert_eq!(code.content, "cargo");
        assert_eq!(code.style.fg, Some(Color::LightYellow));
    }

    #[test]
    fn test_heading_after_paragraph() {
        let lines = render("intro\n\n## Title");
        assert_eq!(plain(&lines), vec!["intro", "", "Title"]);
        assert!(lines[2].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_link_shows_url() {
        assert_eq!(
            plain(&render("[docs](https://example.com)")),
            vec!["docs (https://example.com)"]
        );
    }

    #[test]
    fn test_autolink_not_duplicated() {
        assert_eq!(
            plain(&render("<https://example.com>")),
            vec!["https://example.com"]
        );
    }

    #[test]
    fn test_inline_math() {
        let lines = render("Energy is $E = mc^2$ here");
        assert_eq!(plain(&lines), vec!["Energy is E = mc² here"]);
        assert_eq!(lines[0].spans[1].style.fg, Some(Color::LightMagenta));
    }

    #[test]
    fn test_display_math() {
        assert_eq!(plain(&render("$$\\frac{a}{b}$$")), vec!["  a/b"]);
    }

    #[test]
    fn test_latex_paren_delimiters() {
        assert_eq!(plain(&render("so \\(x^2\\) holds")), vec!["so x² holds"]);
        assert_eq!(plain(&render("\\[\\alpha\\]")), vec!["  α"]);
    }

    #[test]
    fn test_latex_delimiters_left_alone_in_code() {
        assert_eq!(
            plain(&render("write `\\(x\\)` literally")),
            vec!["write \\(x\\) literally"]
        );
        assert_eq!(
            plain(&render("```\n\\[a\\]\n```\n\nbut \\(b\\) converts")),
            vec!["  \\[a\\]", "", "but b converts"]
        );
    }

    #[test]
    fn test_block_quote_prefixed() {
        assert_eq!(plain(&render("> quoted\n\nafter")), vec!["│ quoted", "", "after"]);
        assert_eq!(plain(&render("> one\n>\n> two")), vec!["│ one", "│ ", "│ two"]);
    }

    #[test]
    fn test_nested_block_quote() {
        assert_eq!(plain(&render("> > deep")), vec!["│ │ deep"]);
    }

    #[test]
    fn test_rule() {
        let lines = render("a\n\n---\n\nb");
        assert_eq!(plain(&lines)[2], "─".repeat(RULE_WIDTH));
    }

    #[test]
    fn test_strikethrough() {
        let lines = render("~~gone~~");
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::CROSSED_OUT));
    }
}
