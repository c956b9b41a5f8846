use std::fmt;

/// Longest number the prompt accepts.
pub const MAX_INPUT_LEN: usize = 9;

/// Why typed input was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    NotANumber(String),
    OutOfRange { value: u64, min: u64, max: u64 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Empty => write!(f, "Type a number and press Enter"),
            InputError::NotANumber(raw) => write!(f, "'{raw}' is not a number"),
            InputError::OutOfRange { value, min, max } => {
                write!(f, "{value} is out of range ({min}-{max})")
            }
        }
    }
}

/// Parse a whole number within `min..=max`.
pub fn parse_number(raw: &str, min: u64, max: u64) -> Result<u64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    let value: u64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    if value < min || value > max {
        return Err(InputError::OutOfRange { value, min, max });
    }
    Ok(value)
}

/// Parse a 1-based menu choice into a 0-based index.
pub fn parse_choice(raw: &str, count: usize) -> Result<usize, InputError> {
    parse_number(raw, 1, count as u64).map(|value| value as usize - 1)
}

/// Text typed at the prompt.
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    buffer: String,
}

impl InputLine {
    pub fn push(&mut self, ch: char) {
        if !ch.is_control() && self.buffer.chars().count() < MAX_INPUT_LEN {
            self.buffer.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Return the typed text and clear the line.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
