use ratatui::{
    style::Style,
    text::{Line, Span},
};

fn text_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Split into alternating runs of whitespace and non-whitespace
fn tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

fn push_token(spans: &mut Vec<Span<'static>>, token: &str, style: Style) {
    match spans.last_mut() {
        Some(last) if last.style == style => last.content.to_mut().push_str(token),
        _ => spans.push(Span::styled(token.to_string(), style)),
    }
}

/// Close a wrapped line, dropping whitespace left dangling at its end
fn finish_line(mut spans: Vec<Span<'static>>) -> Line<'static> {
    while let Some(last) = spans.last_mut() {
        let trimmed = last.content.trim_end().len();
        if trimmed == 0 {
            spans.pop();
        } else {
            last.content.to_mut().truncate(trimmed);
            break;
        }
    }
    Line::from(spans)
}

/// Wrap a styled line to `width` columns on word boundaries, keeping span
/// styles. Words longer than the width are broken mid-word.
pub fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line.clone()];
    }

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    for span in &line.spans {
        let style = line.style.patch(span.style);

        for token in tokens(&span.content) {
            let token_width = text_width(token);
            let is_space = token.chars().all(char::is_whitespace);

            if current_width + token_width <= width {
                push_token(&mut current, token, style);
                current_width += token_width;
            } else if is_space {
                // Break here; the whitespace itself is swallowed
                if current_width > 0 {
                    lines.push(finish_line(std::mem::take(&mut current)));
                    current_width = 0;
                }
            } else if token_width <= width {
                if current_width > 0 {
                    lines.push(finish_line(std::mem::take(&mut current)));
                }
                push_token(&mut current, token, style);
                current_width = token_width;
            } else {
                for c in token.chars() {
                    let mut buf = [0u8; 4];
                    let piece: &str = c.encode_utf8(&mut buf);
                    let char_width = text_width(piece);
                    if current_width > 0 && current_width + char_width > width {
                        lines.push(finish_line(std::mem::take(&mut current)));
                        current_width = 0;
                    }
                    push_token(&mut current, piece, style);
                    current_width += char_width;
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(finish_line(current));
    }

    lines
}
