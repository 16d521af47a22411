//! Markdown to terminal text.
//!
//! Analysis replies come back as markdown. [`to_terminal_text`] flattens them
//! into plain text that reads well in a terminal: underlined headings,
//! bulleted and numbered lists, indented code blocks and inline link targets.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const RULE_WIDTH: usize = 40;

pub fn to_terminal_text(markdown: &str) -> String {
    let mut out = String::new();
    // One counter per open list; `None` for bulleted lists.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut links: Vec<String> = Vec::new();
    let mut heading_start = 0;
    let mut in_code_block = false;

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                start_line(&mut out);
                heading_start = out.len();
            }
            Event::End(TagEnd::Heading(level)) => {
                let width = out[heading_start..].chars().count();
                let underline = if level == HeadingLevel::H1 { '=' } else { '-' };
                out.push('\n');
                out.extend(std::iter::repeat(underline).take(width));
                out.push_str("\n\n");
            }
            Event::End(TagEnd::Paragraph) => {
                out.push_str(if lists.is_empty() { "\n\n" } else { "\n" });
            }
            Event::Start(Tag::List(first)) => {
                start_line(&mut out);
                lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                start_line(&mut out);
                let depth = lists.len().saturating_sub(1);
                out.push_str(&"  ".repeat(depth));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{n}. "));
                        *n += 1;
                    }
                    _ => out.push_str("• "),
                }
            }
            Event::End(TagEnd::Item) => start_line(&mut out),
            Event::Start(Tag::CodeBlock(_)) => {
                start_line(&mut out);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push('\n');
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                links.push(dest_url.into_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(url) = links.pop() {
                    if !out.ends_with(url.as_str()) {
                        out.push_str(&format!(" ({url})"));
                    }
                }
            }
            Event::Text(text) if in_code_block => {
                for line in text.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Event::Text(text) => out.push_str(&text),
            Event::Code(code) => {
                out.push('`');
                out.push_str(&code);
                out.push('`');
            }
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Rule => {
                start_line(&mut out);
                out.push_str(&"─".repeat(RULE_WIDTH));
                out.push_str("\n\n");
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_paragraphs_and_bullets() {
        let md = "# Mood\n\nYou seem **calm**.\n\n- slept well\n- walked";
        assert_eq!(
            to_terminal_text(md),
            "Mood\n====\n\nYou seem calm.\n\n• slept well\n• walked"
        );
    }

    #[test]
    fn subheadings_use_dashes() {
        assert_eq!(to_terminal_text("## Themes"), "Themes\n------");
    }

    #[test]
    fn ordered_lists_are_numbered() {
        assert_eq!(to_terminal_text("1. rest\n2. hydrate"), "1. rest\n2. hydrate");
    }

    #[test]
    fn nested_lists_are_indented() {
        let md = "- work\n  - meetings\n- home";
        assert_eq!(to_terminal_text(md), "• work\n  • meetings\n• home");
    }

    #[test]
    fn links_show_target() {
        assert_eq!(
            to_terminal_text("See [this guide](https://example.com/sleep)."),
            "See this guide (https://example.com/sleep)."
        );
    }

    #[test]
    fn code_blocks_are_indented() {
        let md = "Try:\n\n```\nbreathe in\nbreathe out\n```";
        assert_eq!(
            to_terminal_text(md),
            "Try:\n\n    breathe in\n    breathe out"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        let text = "Error connecting to Ollama. Make sure Ollama is running locally.";
        assert_eq!(to_terminal_text(text), text);
    }
}
