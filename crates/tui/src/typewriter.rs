//! Message log with letter-by-letter reveal.

use std::{collections::VecDeque, time::Duration};

const LOG_CAPACITY: usize = 200;

/// Scrolling log; new messages are revealed one character per `delay`.
#[derive(Debug, Clone)]
pub struct MessageLog {
    shown: VecDeque<String>,
    pending: VecDeque<String>,
    current: Option<(Vec<char>, usize)>,
    delay: Duration,
    carry: Duration,
}

impl MessageLog {
    pub fn new(delay: Duration) -> Self {
        Self {
            shown: VecDeque::new(),
            pending: VecDeque::new(),
            current: None,
            delay,
            carry: Duration::ZERO,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.delay.is_zero() {
            self.append(message);
        } else {
            self.pending.push_back(message);
        }
    }

    pub fn extend<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            self.push(message);
        }
    }

    /// Whether text is still being revealed.
    pub fn is_revealing(&self) -> bool {
        self.current.is_some() || !self.pending.is_empty()
    }

    /// Reveal as many characters as `elapsed` pays for.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.delay.is_zero() {
            self.flush();
            return;
        }
        self.carry += elapsed;
        while self.carry >= self.delay {
            self.carry -= self.delay;
            if !self.reveal_one() {
                self.carry = Duration::ZERO;
                break;
            }
        }
    }

    /// Reveal everything immediately.
    pub fn flush(&mut self) {
        if let Some((chars, _)) = self.current.take() {
            self.append(chars.into_iter().collect());
        }
        while let Some(message) = self.pending.pop_front() {
            self.append(message);
        }
    }

    /// The last `count` lines, including the one being revealed.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let partial = self
            .current
            .as_ref()
            .map(|(chars, revealed)| chars[..*revealed].iter().collect::<String>());
        let mut lines: Vec<String> = self.shown.iter().cloned().chain(partial).collect();
        let start = lines.len().saturating_sub(count);
        lines.drain(..start);
        lines
    }

    fn reveal_one(&mut self) -> bool {
        if self.current.is_none() {
            match self.pending.pop_front() {
                Some(message) => self.current = Some((message.chars().collect(), 0)),
                None => return false,
            }
        }
        if let Some((chars, revealed)) = self.current.as_mut() {
            if *revealed < chars.len() {
                *revealed += 1;
            }
            if *revealed >= chars.len() {
                if let Some((chars, _)) = self.current.take() {
                    self.append(chars.into_iter().collect());
                }
            }
        }
        true
    }

    fn append(&mut self, message: String) {
        self.shown.push_back(message);
        while self.shown.len() > LOG_CAPACITY {
            self.shown.pop_front();
        }
    }
}
