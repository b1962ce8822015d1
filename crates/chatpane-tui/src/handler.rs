use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use chatpane_core::Role;
use crate::app::App;
use crate::tui::AppEvent;

const MOUSE_SCROLL_LINES: usize = 3;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('d') => app.transcript_state.scroll_half_page_down(),
            KeyCode::Char('u') => app.transcript_state.scroll_half_page_up(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('l') => app.toggle_loading(),
        KeyCode::Char('t') => app.toggle_thinking(),
        KeyCode::Char('u') => app.push_demo_message(Role::User),
        KeyCode::Char('a') => app.push_demo_message(Role::Ai),
        KeyCode::Char('c') => app.clear(),
        KeyCode::Char('j') | KeyCode::Down => app.transcript_state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.transcript_state.scroll_up(1),
        KeyCode::PageDown => app.transcript_state.scroll_half_page_down(),
        KeyCode::PageUp => app.transcript_state.scroll_half_page_up(),
        KeyCode::Char('g') | KeyCode::Home => app.transcript_state.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.transcript_state.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.transcript_state.scroll_down(MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollUp => app.transcript_state.scroll_up(MOUSE_SCROLL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sample;
    use crate::ui;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn instant_app() -> App {
        let mut config = Config::new();
        config.smooth_scroll = false;
        App::new(Vec::new(), config)
    }

    #[test]
    fn test_quit_keys() {
        for event in [key(KeyCode::Char('q')), key(KeyCode::Esc), ctrl('c')] {
            let mut app = instant_app();
            handle_event(&mut app, event).unwrap();
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_toggle_and_append_keys() {
        let mut app = instant_app();
        handle_event(&mut app, key(KeyCode::Char('l'))).unwrap();
        handle_event(&mut app, key(KeyCode::Char('t'))).unwrap();
        handle_event(&mut app, key(KeyCode::Char('u'))).unwrap();
        handle_event(&mut app, key(KeyCode::Char('a'))).unwrap();

        assert!(app.is_loading);
        assert!(app.is_thinking);
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[0].role, Role::User);
        assert_eq!(app.messages[1].role, Role::Ai);

        handle_event(&mut app, key(KeyCode::Char('c'))).unwrap();
        assert!(app.messages.is_empty());
    }

    #[test]
    fn test_every_input_change_scrolls_to_bottom() {
        let mut app = instant_app();
        app.messages = sample::conversation();
        let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
        terminal.draw(|f| ui::render(&mut app, f)).unwrap();
        assert_eq!(app.transcript_state.anchor().requests(), 1);

        for code in ['l', 't', 'u', 'a'] {
            app.transcript_state.scroll_to_top();
            let before = app.transcript_state.anchor().requests();
            handle_event(&mut app, key(KeyCode::Char(code))).unwrap();
            terminal.draw(|f| ui::render(&mut app, f)).unwrap();

            assert_eq!(app.transcript_state.anchor().requests(), before + 1);
            assert!(app.transcript_state.is_at_bottom());
        }

        // Ticks animate the indicators without scrolling
        let before = app.transcript_state.anchor().requests();
        handle_event(&mut app, AppEvent::Tick).unwrap();
        terminal.draw(|f| ui::render(&mut app, f)).unwrap();
        assert_eq!(app.transcript_state.anchor().requests(), before);
    }

    #[test]
    fn test_scroll_keys() {
        let mut app = instant_app();
        app.messages = sample::conversation();
        let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
        terminal.draw(|f| ui::render(&mut app, f)).unwrap();
        let bottom = app.transcript_state.offset();
        assert!(bottom > 0);

        handle_event(&mut app, key(KeyCode::Char('k'))).unwrap();
        assert_eq!(app.transcript_state.offset(), bottom - 1);

        handle_event(&mut app, key(KeyCode::Char('g'))).unwrap();
        assert_eq!(app.transcript_state.offset(), 0);

        handle_event(&mut app, ctrl('d')).unwrap();
        assert!(app.transcript_state.offset() > 0);

        handle_event(&mut app, key(KeyCode::Char('G'))).unwrap();
        assert_eq!(app.transcript_state.offset(), bottom);
    }

    #[test]
    fn test_mouse_wheel_scrolls() {
        let mut app = instant_app();
        app.messages = sample::conversation();
        let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
        terminal.draw(|f| ui::render(&mut app, f)).unwrap();
        let bottom = app.transcript_state.offset();

        let wheel_up = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 10,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        handle_event(&mut app, AppEvent::Mouse(wheel_up)).unwrap();
        assert_eq!(app.transcript_state.offset(), bottom.saturating_sub(MOUSE_SCROLL_LINES));
    }
}
