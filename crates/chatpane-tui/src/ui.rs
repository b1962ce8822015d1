use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use crate::app::App;
use crate::transcript::Transcript;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, body_area);
    render_footer(frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            " chatpane ",
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", app.status()), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let transcript = Transcript::new(&app.messages, app.is_loading, app.is_thinking)
        .frame(app.animation_frame)
        .bubble_width_percent(app.config.bubble_width_percent)
        .block(block);

    frame.render_stateful_widget(transcript, area, &mut app.transcript_state);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::DarkGray);

    let hints = [
        ("l", " loading "),
        ("t", " thinking "),
        ("u/a", " add user/ai "),
        ("c", " clear "),
        ("j/k", " scroll "),
        ("g/G", " top/bottom "),
        ("q", " quit"),
    ];
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {}", key), key_style),
                Span::styled(*label, label_style),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
