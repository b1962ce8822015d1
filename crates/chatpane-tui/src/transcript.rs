//! Chat transcript widget
//!
//! `Transcript` is rebuilt every frame from the caller's messages and the two
//! indicator flags. It lays out one bubble per message (user bubbles on the
//! right, assistant bubbles on the left behind an avatar), then an optional
//! loading row and an optional thinking row. `TranscriptState` is the only
//! thing that survives between frames: it holds the trailing scroll anchor
//! and the viewport offset the anchor drives.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chatpane_core::{ChatMessage, Role};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};

use crate::anchor::{ScrollAnchor, ScrollBehavior};
use crate::{markdown, wrap};

pub const AVATAR: &str = "▂▄▆";
pub const THINKING_LABEL: &str = "Thinking...";
pub const DEFAULT_BUBBLE_WIDTH_PERCENT: u16 = 75;

const LOADING_DOT: &str = "●";
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
const AVATAR_GAP: u16 = 1;
const ROW_GAP: usize = 1;
const BUBBLE_PADDING: u16 = 1;

fn user_bubble_style() -> Style {
    Style::default().bg(Color::Rgb(79, 70, 229)).fg(Color::White)
}

fn ai_bubble_style() -> Style {
    Style::default()
        .bg(Color::Rgb(55, 65, 81))
        .fg(Color::Rgb(229, 231, 235))
}

fn avatar_style() -> Style {
    Style::default()
        .fg(Color::Rgb(99, 102, 241))
        .add_modifier(Modifier::BOLD)
}

fn indicator_style() -> Style {
    Style::default().fg(Color::Rgb(129, 140, 248))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Message { index: usize, role: Role },
    Loading,
    Thinking,
}

/// One visual row of the transcript, before wrapping
#[derive(Debug, Clone)]
pub struct Row {
    pub kind: RowKind,
    pub alignment: Alignment,
    pub avatar: bool,
    pub content: Vec<Line<'static>>,
    pub style: Style,
}

impl Row {
    fn message(index: usize, message: &ChatMessage) -> Self {
        let user = message.role.is_user();
        Self {
            kind: RowKind::Message {
                index,
                role: message.role,
            },
            alignment: if user { Alignment::Right } else { Alignment::Left },
            avatar: !user,
            content: markdown::render(&message.content),
            style: if user {
                user_bubble_style()
            } else {
                ai_bubble_style()
            },
        }
    }

    fn loading(frame: u8) -> Self {
        // The highlighted dot walks left to right, one step per frame
        let active = (frame % 3) as usize;
        let mut spans = Vec::with_capacity(5);
        for i in 0..3 {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let modifier = if i == active { Modifier::BOLD } else { Modifier::DIM };
            spans.push(Span::styled(
                LOADING_DOT,
                indicator_style().add_modifier(modifier),
            ));
        }

        Self {
            kind: RowKind::Loading,
            alignment: Alignment::Left,
            avatar: true,
            content: vec![Line::from(spans)],
            style: ai_bubble_style(),
        }
    }

    fn thinking(frame: u8) -> Self {
        let spinner = SPINNER[frame as usize % SPINNER.len()];
        Self {
            kind: RowKind::Thinking,
            alignment: Alignment::Left,
            avatar: true,
            content: vec![Line::from(vec![
                Span::styled(spinner, indicator_style()),
                Span::raw(" "),
                Span::raw(THINKING_LABEL),
            ])],
            style: ai_bubble_style(),
        }
    }

    /// Plain text of the row (no styling), one line per content line
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct PlacedRow {
    row: Row,
    top: usize,
    lines: Vec<Line<'static>>,
    bubble_width: u16,
}

struct TranscriptLayout {
    rows: Vec<PlacedRow>,
    height: usize,
}

fn avatar_width() -> u16 {
    Span::raw(AVATAR).width() as u16 + AVATAR_GAP
}

/// The transcript view for one frame
pub struct Transcript<'a> {
    messages: &'a [ChatMessage],
    is_loading: bool,
    is_thinking: bool,
    frame: u8,
    bubble_width_percent: u16,
    block: Option<Block<'a>>,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [ChatMessage], is_loading: bool, is_thinking: bool) -> Self {
        Self {
            messages,
            is_loading,
            is_thinking,
            frame: 0,
            bubble_width_percent: DEFAULT_BUBBLE_WIDTH_PERCENT,
            block: None,
        }
    }

    /// Animation frame for the indicators. Not an input: changing it never
    /// scrolls.
    pub fn frame(mut self, frame: u8) -> Self {
        self.frame = frame;
        self
    }

    pub fn bubble_width_percent(mut self, percent: u16) -> Self {
        self.bubble_width_percent = percent.clamp(10, 100);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Rows in display order: messages, then loading, then thinking
    pub fn rows(&self) -> Vec<Row> {
        let mut rows: Vec<Row> = self
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| Row::message(index, message))
            .collect();

        if self.is_loading {
            rows.push(Row::loading(self.frame));
        }
        if self.is_thinking {
            rows.push(Row::thinking(self.frame));
        }

        rows
    }

    /// Identity of the three inputs; a change means the anchor must scroll
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.messages.hash(&mut hasher);
        self.is_loading.hash(&mut hasher);
        self.is_thinking.hash(&mut hasher);
        hasher.finish()
    }

    fn layout(&self, width: u16) -> TranscriptLayout {
        let max_bubble = (u32::from(width) * u32::from(self.bubble_width_percent) / 100) as u16;
        let max_bubble = max_bubble.max(BUBBLE_PADDING * 2 + 1);

        let mut placed: Vec<PlacedRow> = Vec::new();
        let mut top = 0;

        for row in self.rows() {
            let available = if row.avatar {
                width.saturating_sub(avatar_width())
            } else {
                width
            };
            let content_width = max_bubble
                .min(available)
                .saturating_sub(BUBBLE_PADDING * 2)
                .max(1) as usize;

            let lines: Vec<Line<'static>> = row
                .content
                .iter()
                .flat_map(|line| wrap::wrap_line(line, content_width))
                .collect();
            let text_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
            let bubble_width = (text_width + BUBBLE_PADDING * 2).min(available);

            if !placed.is_empty() {
                top += ROW_GAP;
            }
            let height = lines.len();
            placed.push(PlacedRow {
                row,
                top,
                lines,
                bubble_width,
            });
            top += height;
        }

        TranscriptLayout {
            rows: placed,
            height: top,
        }
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(mut self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let area = match self.block.take() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        // Rightmost column is kept free for the scrollbar
        let content_area = Rect {
            width: area.width.saturating_sub(1),
            ..area
        };
        let layout = self.layout(content_area.width);
        state.commit(self.fingerprint(), layout.height, usize::from(area.height));

        if content_area.width <= avatar_width() || area.height == 0 {
            return;
        }

        let offset = state.offset();
        let view_height = usize::from(area.height);

        for placed in &layout.rows {
            let last = placed.lines.len().saturating_sub(1);
            for (i, line) in placed.lines.iter().enumerate() {
                let virtual_y = placed.top + i;
                if virtual_y < offset || virtual_y >= offset + view_height {
                    continue;
                }
                let y = area.y + (virtual_y - offset) as u16;
                let x = match placed.row.alignment {
                    Alignment::Right => content_area.right().saturating_sub(placed.bubble_width),
                    _ if placed.row.avatar => content_area.x + avatar_width(),
                    _ => content_area.x,
                };

                buf.set_style(Rect::new(x, y, placed.bubble_width, 1), placed.row.style);
                buf.set_line(
                    x + BUBBLE_PADDING,
                    y,
                    line,
                    placed.bubble_width.saturating_sub(BUBBLE_PADDING * 2),
                );

                // Avatar sits level with the bottom of its bubble
                if placed.row.avatar && i == last {
                    buf.set_string(content_area.x, y, AVATAR, avatar_style());
                }
            }
        }

        if layout.height > view_height {
            let mut scrollbar_state = ScrollbarState::new(layout.height)
                .viewport_content_length(view_height)
                .position(offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .render(area, buf, &mut scrollbar_state);
        }
    }
}

/// Retained state of the transcript: the trailing anchor and the viewport
/// offset (in lines from the top of the content)
#[derive(Debug, Default)]
pub struct TranscriptState {
    offset: usize,
    target: Option<usize>,
    content_height: usize,
    viewport_height: usize,
    last_inputs: Option<u64>,
    anchor: ScrollAnchor,
    behavior: ScrollBehavior,
}

impl TranscriptState {
    pub fn new(behavior: ScrollBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn anchor(&self) -> &ScrollAnchor {
        &self.anchor
    }

    pub fn content_height(&self) -> usize {
        self.content_height
    }

    /// Offset at which the anchor (just past the last row) is in view
    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn is_scrolling(&self) -> bool {
        self.target.is_some()
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.target = None;
        self.offset = (self.offset + lines).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.target = None;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_down((self.viewport_height / 2).max(1));
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_up((self.viewport_height / 2).max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.target = None;
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.target = None;
        self.offset = self.max_offset();
    }

    /// Advance a smooth scroll by half the remaining distance. Returns true
    /// if the offset moved.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        if self.offset == target {
            self.target = None;
            return false;
        }

        let distance = self.offset.abs_diff(target);
        let step = distance.div_ceil(2);
        if self.offset < target {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        if self.offset == target {
            self.target = None;
        }
        true
    }

    /// Runs once per frame after layout: records the content size, fires the
    /// anchor when the inputs changed and applies any pending request.
    fn commit(&mut self, inputs: u64, content_height: usize, viewport_height: usize) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        if self.last_inputs != Some(inputs) {
            self.last_inputs = Some(inputs);
            self.anchor.scroll_into_view(self.behavior);
        }

        let max_offset = self.max_offset();
        self.offset = self.offset.min(max_offset);
        self.target = self.target.map(|target| target.min(max_offset));

        match self.anchor.take_pending() {
            Some(ScrollBehavior::Instant) => {
                self.offset = max_offset;
                self.target = None;
            }
            Some(ScrollBehavior::Smooth) => {
                self.target = (self.offset != max_offset).then_some(max_offset);
            }
            None => {}
        }
    }
}
