use blackjack::Decision;
use std::fmt;

/// Rounds played when the answer to the rounds prompt isn't a number.
pub const DEFAULT_ROUNDS: u8 = 1;

/// Errors that can occur while reading a hit/stand choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Nothing but whitespace was entered.
    Empty,
    /// Unrecognized choice.
    Unrecognized(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Invalid input. Type 'hit' or 'stand'"),
            Self::Unrecognized(choice) => write!(
                f,
                "Invalid input '{}'. Type 'hit' (or 'h') or 'stand' (or 's')",
                choice
            ),
        }
    }
}

impl std::error::Error for InputError {}

/// Parse a hit/stand choice. Matching ignores case and surrounding
/// whitespace.
///
/// # Examples
///
/// ```
/// use bj_client::commands::parse_decision;
/// use blackjack::Decision;
///
/// assert_eq!(parse_decision("hit"), Ok(Decision::Hit));
/// assert_eq!(parse_decision(" S "), Ok(Decision::Stand));
/// assert!(parse_decision("split").is_err());
/// ```
pub fn parse_decision(input: &str) -> Result<Decision, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "hit" | "h" => Ok(Decision::Hit),
        "stand" | "s" => Ok(Decision::Stand),
        _ => Err(InputError::Unrecognized(trimmed.to_string())),
    }
}

/// Parse the number of rounds to request, falling back to
/// [`DEFAULT_ROUNDS`] for anything that isn't a count from 0 to 255.
///
/// # Examples
///
/// ```
/// use bj_client::commands::parse_rounds;
///
/// assert_eq!(parse_rounds("5"), 5);
/// assert_eq!(parse_rounds("lots"), 1);
/// ```
#[must_use]
pub fn parse_rounds(input: &str) -> u8 {
    input.trim().parse().unwrap_or(DEFAULT_ROUNDS)
}
