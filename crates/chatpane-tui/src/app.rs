use chatpane_core::{ChatMessage, Role};
use tracing::{debug, info};

use crate::config::Config;
use crate::sample;
use crate::transcript::TranscriptState;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub config: Config,

    // Conversation owned by the host; the transcript only reads it
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
    pub is_thinking: bool,

    // View state
    pub transcript_state: TranscriptState,

    // Animation state
    pub animation_frame: u8,

    demo_counter: usize,
}

impl App {
    pub fn new(messages: Vec<ChatMessage>, config: Config) -> Self {
        let transcript_state = TranscriptState::new(config.scroll_behavior());
        Self {
            should_quit: false,
            config,
            messages,
            is_loading: false,
            is_thinking: false,
            transcript_state,
            animation_frame: 0,
            demo_counter: 0,
        }
    }

    pub fn toggle_loading(&mut self) {
        self.is_loading = !self.is_loading;
        debug!(is_loading = self.is_loading, "Toggled loading indicator");
    }

    pub fn toggle_thinking(&mut self) {
        self.is_thinking = !self.is_thinking;
        debug!(is_thinking = self.is_thinking, "Toggled thinking indicator");
    }

    /// Append the next scripted message for `role`
    pub fn push_demo_message(&mut self, role: Role) {
        let message = match role {
            Role::User => sample::question(self.demo_counter),
            Role::Ai => {
                let reply = sample::reply(self.demo_counter);
                self.demo_counter += 1;
                reply
            }
        };
        debug!(role = role.as_str(), "Appending message");
        self.messages.push(message);
    }

    /// Discard the whole conversation
    pub fn clear(&mut self) {
        info!(count = self.messages.len(), "Clearing conversation");
        self.messages = Vec::new();
    }

    /// Tick animation frame and smooth scrolling (called by Tick event)
    pub fn tick(&mut self) {
        if self.is_loading || self.is_thinking {
            self.animation_frame = self.animation_frame.wrapping_add(1);
        }
        self.transcript_state.tick();
    }

    pub fn status(&self) -> String {
        let mut status = format!("{} messages", self.messages.len());
        if self.is_loading {
            status.push_str(" · loading");
        }
        if self.is_thinking {
            status.push_str(" · thinking");
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_messages_alternate_script() {
        let mut app = App::new(Vec::new(), Config::new());
        app.push_demo_message(Role::User);
        app.push_demo_message(Role::Ai);
        app.push_demo_message(Role::User);

        assert_eq!(app.messages.len(), 3);
        assert_eq!(app.messages[0], sample::question(0));
        assert_eq!(app.messages[1], sample::reply(0));
        assert_eq!(app.messages[2], sample::question(1));
    }

    #[test]
    fn test_flags_are_independent() {
        let mut app = App::new(Vec::new(), Config::new());
        app.toggle_loading();
        app.toggle_thinking();
        assert!(app.is_loading && app.is_thinking);
        app.toggle_loading();
        assert!(!app.is_loading && app.is_thinking);
        assert_eq!(app.status(), "0 messages · thinking");
    }

    #[test]
    fn test_tick_animates_only_with_indicator() {
        let mut app = App::new(Vec::new(), Config::new());
        app.tick();
        assert_eq!(app.animation_frame, 0);
        app.toggle_thinking();
        app.tick();
        assert_eq!(app.animation_frame, 1);
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut app = App::new(sample::conversation(), Config::new());
        app.clear();
        assert!(app.messages.is_empty());
    }
}
