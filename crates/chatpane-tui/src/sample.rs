use chatpane_core::ChatMessage;

/// Conversation shown when no transcript file is given
pub fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("What is Euler's identity?"),
        ChatMessage::ai(
            "**Euler's identity** links five constants:\n\n\
             $$e^{i\\pi} + 1 = 0$$\n\n\
             It follows from $e^{ix} = \\cos x + i \\sin x$ at $x = \\pi$.",
        ),
        ChatMessage::user("And the quadratic formula?"),
        ChatMessage::ai(
            "For $ax^2 + bx + c = 0$:\n\n\
             \\[x = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}\\]\n\n\
             - two real roots when $b^2 - 4ac > 0$\n\
             - one repeated root when it equals `0`\n\
             - complex roots otherwise",
        ),
    ]
}

const DEMO_QUESTIONS: [&str; 3] = [
    "Can you sum the first *n* integers?",
    "What is $\\sum_{k=1}^{n} k^2$?",
    "Thanks!",
];

const DEMO_REPLIES: [&str; 3] = [
    "Sure: $\\sum_{k=1}^{n} k = \\frac{n(n+1)}{2}$.",
    "It is $\\frac{n(n+1)(2n+1)}{6}$, provable by induction on $n$.",
    "You're welcome. Ask away any time.",
];

/// Canned user message, cycling through a short script
pub fn question(counter: usize) -> ChatMessage {
    ChatMessage::user(DEMO_QUESTIONS[counter % DEMO_QUESTIONS.len()])
}

/// Canned assistant message, cycling through a short script
pub fn reply(counter: usize) -> ChatMessage {
    ChatMessage::ai(DEMO_REPLIES[counter % DEMO_REPLIES.len()])
}
