//! Stdin command parsing for headless play

use vizlearn_app::Message;

/// A parsed stdin line
#[derive(Debug, Clone)]
pub enum Command {
    /// Forward to the state machine
    Send(Message),
    /// Print starter topics for an age (handled by the reader itself)
    Topics(u8),
}

/// Parse one stdin line. `Ok(None)` for blank lines.
///
/// Quiz options are numbered from 1 on the command line.
pub fn parse_command(line: &str, default_age: u8) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let message = match verb {
        "generate" | "g" => {
            let (age, topic) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: generate <age> <topic>")?;
            let age = age
                .parse::<u8>()
                .map_err(|_| format!("age must be a number, got '{}'", age))?;
            Message::SubmitTopic {
                topic: topic.trim().to_string(),
                age,
            }
        }
        "load" | "l" => Message::LoadLesson {
            filename: rest.to_string(),
        },
        "list" | "ls" => Message::RefreshLessons,
        "next" | "n" => Message::NextStep,
        "prev" | "p" => Message::PrevStep,
        "quiz" => Message::StartQuiz,
        "answer" | "a" => {
            let option = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or("usage: answer <option number, from 1>")?;
            Message::AnswerQuestion { option: option - 1 }
        }
        "continue" | "c" => Message::AdvanceQuiz,
        "home" | "back" => Message::BackToHome,
        "dismiss" => Message::DismissError,
        "q" | "quit" => Message::Quit,
        "topics" => {
            let age = if rest.is_empty() {
                default_age
            } else {
                rest.parse::<u8>()
                    .map_err(|_| format!("age must be a number, got '{}'", rest))?
            };
            return Ok(Some(Command::Topics(age)));
        }
        other => return Err(format!("unknown command '{}'", other)),
    };

    Ok(Some(Command::Send(message)))
}
