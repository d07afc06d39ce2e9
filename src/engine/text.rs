use pulldown_cmark::{Event, Parser, TagEnd};

/// Width of a single line of text at a font size, in screen pixels.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed advance per character, as a fraction of the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.advance
    }
}

/// Cuts `text` to at most `max_chars` characters, ending in an ellipsis
/// when anything was dropped.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut truncated = text.chars().take(max_chars - 1).collect::<String>();
    truncated.truncate(truncated.trim_end().len());
    truncated.push('…');
    truncated
}

/// Plain text of a markdown snippet with whitespace collapsed.
pub fn strip_markdown(markdown: &str) -> String {
    let mut plain = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => plain.push_str(&text),
            Event::SoftBreak | Event::HardBreak => plain.push(' '),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => plain.push(' '),
            _ => {}
        }
    }

    plain.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy word wrap under a per-line character budget, a line budget and a
/// total character budget. When text was cut the last kept line gets a
/// trailing ellipsis.
pub fn wrap_text(text: &str, line_chars: usize, max_lines: usize, max_chars: usize) -> Vec<String> {
    if line_chars == 0 || max_lines == 0 || max_chars == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut used = 0usize;
    let mut truncated = false;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if used + word_len > max_chars {
            truncated = true;
            break;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word_len > line_chars {
            if lines.len() + 1 >= max_lines {
                truncated = true;
                break;
            }
            lines.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }
        if word_len > line_chars {
            current.push_str(&truncate_label(word, line_chars));
        } else {
            current.push_str(word);
        }
        used += word_len;
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if truncated && let Some(last) = lines.last_mut() {
        last.push('…');
    }
    lines
}
