//! Line-oriented terminal front end for a running quiz session.

use std::fmt::{self, Write as _};

use quiz_core::model::QuizAttempt;
use services::session::format_clock;
use services::{AttemptReview, QuestionStatus, QuizSession, SessionCommand, SubmitPrompt};
use tokio::sync::mpsc;

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Ticks are announced on whole minutes and during the final countdown.
const FINAL_SECONDS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    Unknown(String),
    BadQuestionNumber(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Empty => write!(f, "type a command (h for help)"),
            InputError::Unknown(raw) => write!(f, "unknown command: {raw} (h for help)"),
            InputError::BadQuestionNumber(raw) => write!(f, "not a question number: {raw}"),
        }
    }
}

impl std::error::Error for InputError {}

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(SessionCommand),
    Help,
}

/// Parses a line typed during a session.
///
/// Options are chosen by letter (`a`-`d`) or number (`1`-`4`); `g <n>` jumps to
/// question `n` (1-based).
pub fn parse_input(line: &str) -> Result<Input, InputError> {
    let line = line.trim().to_ascii_lowercase();
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(InputError::Empty);
    };

    let command = match head {
        "n" | "next" => SessionCommand::Next,
        "p" | "prev" => SessionCommand::Previous,
        "m" | "mark" => SessionCommand::ToggleMark,
        "s" | "submit" => SessionCommand::RequestSubmit,
        "y" | "yes" => SessionCommand::ConfirmSubmit,
        "x" | "back" => SessionCommand::CancelSubmit,
        "q" | "quit" => SessionCommand::Exit,
        "h" | "help" | "?" => return Ok(Input::Help),
        "g" | "go" => {
            let raw = words.next().unwrap_or_default();
            let number: usize = raw
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| InputError::BadQuestionNumber(raw.to_string()))?;
            SessionCommand::JumpTo(number - 1)
        }
        other => match option_index(other) {
            Some(index) => SessionCommand::SelectAnswer(index),
            None => return Err(InputError::Unknown(other.to_string())),
        },
    };
    Ok(Input::Command(command))
}

fn option_index(raw: &str) -> Option<usize> {
    let mut chars = raw.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c {
        'a'..='d' => Some(c as usize - 'a' as usize),
        '1'..='4' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

const EXIT_PROMPT: &str =
    "Are you sure you want to exit? Your progress will be lost. (y = exit, anything else = stay)";

/// What to do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    Send(SessionCommand),
    Say(String),
}

/// Per-session input state. Quitting asks for confirmation first.
#[derive(Debug, Default)]
pub struct InputState {
    confirming_exit: bool,
}

impl InputState {
    pub fn handle(&mut self, line: &str) -> Reaction {
        if std::mem::take(&mut self.confirming_exit) {
            return match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => Reaction::Send(SessionCommand::Exit),
                _ => Reaction::Say("Back to the quiz.".to_string()),
            };
        }
        match parse_input(line) {
            Ok(Input::Command(SessionCommand::Exit)) => {
                self.confirming_exit = true;
                Reaction::Say(EXIT_PROMPT.to_string())
            }
            Ok(Input::Command(command)) => Reaction::Send(command),
            Ok(Input::Help) => Reaction::Say(help_text().to_string()),
            Err(err) => Reaction::Say(err.to_string()),
        }
    }
}

/// Reads stdin on a plain thread until EOF or a confirmed quit, forwarding
/// commands to the driver.
///
/// The thread is detached: a blocking read must not hold up shutdown once the
/// session ends on its own.
pub fn spawn_stdin_reader(commands: mpsc::UnboundedSender<SessionCommand>) {
    std::thread::spawn(move || {
        let mut state = InputState::default();
        for line in std::io::stdin().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::warn!("failed to read input: {err}");
                    break;
                }
            };
            match state.handle(&line) {
                Reaction::Send(command) => {
                    if !forward(&commands, command) {
                        return;
                    }
                }
                Reaction::Say(text) => println!("{text}"),
            }
        }
        forward(&commands, SessionCommand::Exit);
    });
}

/// Sends `command` to the driver. Returns whether the reader should keep going.
fn forward(commands: &mpsc::UnboundedSender<SessionCommand>, command: SessionCommand) -> bool {
    if commands.send(command).is_err() {
        log::debug!("session already ended, dropping {command:?}");
        return false;
    }
    command != SessionCommand::Exit
}

pub fn help_text() -> &'static str {
    "a-d or 1-4  choose an option (again to clear)\n\
     n / p       next / previous question\n\
     g <n>       go to question n\n\
     m           mark for review\n\
     s           submit, then y to confirm or x to keep working\n\
     q           quit without saving (asks first)"
}

/// Whether a countdown value is worth printing.
pub fn announce_tick(remaining: u32) -> bool {
    remaining <= FINAL_SECONDS || remaining % 60 == 0
}

pub fn render_question(session: &QuizSession) -> String {
    let mut out = String::new();
    let progress = session.progress();
    let _ = writeln!(
        out,
        "\n{}  |  question {}/{}  |  answered {}  |  marked {}  |  time {}",
        session.quiz().title(),
        progress.position,
        progress.total,
        progress.answered,
        progress.marked,
        session.format_remaining(),
    );

    if let Some(question) = session.current_question() {
        let marked = session
            .marked_for_review()
            .get(session.current_index())
            .copied()
            .unwrap_or(false);
        let flag = if marked { " [marked]" } else { "" };
        let _ = writeln!(out, "{}{flag}", question.text());
        for (index, option) in question.options().iter().enumerate() {
            let chosen = if session.current_answer() == Some(index) { '*' } else { ' ' };
            let letter = OPTION_LETTERS.get(index).copied().unwrap_or('?');
            let _ = writeln!(out, " {chosen} {letter}) {option}");
        }
    }

    let _ = write!(out, "{}", render_overview(session));
    out
}

/// One cell per question: number plus a status marker.
pub fn render_overview(session: &QuizSession) -> String {
    let cells: Vec<String> = session
        .overview()
        .into_iter()
        .enumerate()
        .map(|(index, status)| {
            let cell = format!("{}{}", index + 1, status_marker(status));
            if index == session.current_index() {
                format!("[{cell}]")
            } else {
                cell
            }
        })
        .collect();
    format!(
        "{}\n  (+ answered, ! marked, ~ answered and marked, - skipped)\n",
        cells.join(" ")
    )
}

fn status_marker(status: QuestionStatus) -> &'static str {
    match status {
        QuestionStatus::AnsweredMarked => "~",
        QuestionStatus::Answered => "+",
        QuestionStatus::Marked => "!",
        QuestionStatus::Skipped => "-",
        QuestionStatus::Unvisited => "",
    }
}

pub fn render_prompt(prompt: SubmitPrompt) -> String {
    match prompt.unanswered {
        0 => "Submit the quiz? (y = submit, x = keep working)".to_string(),
        1 => "1 question is unanswered. Submit anyway? (y / x)".to_string(),
        n => format!("{n} questions are unanswered. Submit anyway? (y / x)"),
    }
}

pub fn render_review(review: &AttemptReview) -> String {
    let mut out = format!(
        "\nScore: {}/{} ({}%)\n",
        review.score, review.total_questions, review.percentage
    );
    for question in &review.questions {
        let mark = if question.is_correct { "correct" } else { "wrong" };
        let _ = writeln!(out, "{}. {} [{mark}]", question.index + 1, question.question);
        let _ = writeln!(
            out,
            "   your answer: {}",
            question.your_answer.as_deref().unwrap_or("(none)")
        );
        if !question.is_correct {
            let _ = writeln!(out, "   correct answer: {}", question.correct_answer);
        }
    }
    out
}

pub fn render_attempt(attempt: &QuizAttempt) -> String {
    format!(
        "{}  {}/{} ({}%)  {}",
        attempt.completed_at().format("%Y-%m-%d %H:%M"),
        attempt.score(),
        attempt.total_questions(),
        attempt.percentage(),
        attempt.id(),
    )
}

pub fn render_clock(remaining: u32) -> String {
    format!("time left {}", format_clock(remaining))
}
