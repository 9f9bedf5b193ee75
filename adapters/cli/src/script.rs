use errand_core::{Command, Direction};
use thiserror::Error;

/// Errors raised while decoding a move script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The script contained a character that names no action.
    #[error("unknown script step '{step}' at position {position}; expected one of U D L R T M S")]
    UnknownStep {
        /// Offending character.
        step: char,
        /// Zero-based character position within the script.
        position: usize,
    },
}

/// Decodes a script where `U`, `D`, `L` and `R` move, `T` ticks, `M` restores
/// the checkpoint and `S` cycles the selected spell.
///
/// Whitespace and commas are ignored so long scripts can be grouped. Letters
/// are case-insensitive.
pub(crate) fn parse(script: &str) -> Result<Vec<Command>, ScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, step)| !step.is_whitespace() && *step != ',')
        .map(|(position, step)| {
            let command = match step.to_ascii_uppercase() {
                'U' => Command::Move {
                    direction: Direction::Up,
                },
                'D' => Command::Move {
                    direction: Direction::Down,
                },
                'L' => Command::Move {
                    direction: Direction::Left,
                },
                'R' => Command::Move {
                    direction: Direction::Right,
                },
                'T' => Command::Tick,
                'M' => Command::Remember,
                'S' => Command::ChangeSelectedSpell,
                _ => return Err(ScriptError::UnknownStep { step, position }),
            };
            Ok(command)
        })
        .collect()
}

/// Inserts a monster tick after every `every` moves; zero leaves the script untouched.
pub(crate) fn with_ticks(commands: Vec<Command>, every: u32) -> Vec<Command> {
    if every == 0 {
        return commands;
    }
    let mut moves = 0_u32;
    let mut scheduled = Vec::with_capacity(commands.len());
    for command in commands {
        let is_move = matches!(command, Command::Move { .. });
        scheduled.push(command);
        if is_move {
            moves += 1;
            if moves % every == 0 {
                scheduled.push(Command::Tick);
            }
        }
    }
    scheduled
}
