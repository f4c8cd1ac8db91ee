use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKey {
    Digit(u8),
    Backspace,
    Confirm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryFeedback {
    /// The buffer changed and should be redrawn.
    Edited,
    /// The typed number was above the maximum and was replaced by it.
    Overflow,
    /// The key had no effect (too many digits, entry closed).
    Ignored,
    /// Entry finished; `Some` carries the clamped value to apply.
    Committed(Option<u16>),
}

/// Keypad entry of a bounded number. The current value is shown
/// pre-selected so the first digit replaces it.
#[derive(Clone, Debug)]
pub struct NumericEntry {
    min: u16,
    max: u16,
    buffer: String,
    replace_next: bool,
    open: bool,
}

impl NumericEntry {
    pub fn new(min: u16, max: u16) -> Self {
        Self {
            min: min.min(max),
            max,
            buffer: String::new(),
            replace_next: false,
            open: false,
        }
    }

    pub fn open(&mut self, current: u16) {
        self.buffer = current.to_string();
        self.replace_next = true;
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the shown value is still the untouched, selected original.
    pub fn is_selected(&self) -> bool {
        self.open && self.replace_next
    }

    /// Text for the display; an empty buffer reads as `0`.
    pub fn display(&self) -> &str {
        if self.buffer.is_empty() {
            "0"
        } else {
            &self.buffer
        }
    }

    pub fn press(&mut self, key: EntryKey) -> EntryFeedback {
        if !self.open {
            return EntryFeedback::Ignored;
        }
        match key {
            EntryKey::Backspace => {
                self.buffer.pop();
                self.replace_next = false;
                EntryFeedback::Edited
            }
            EntryKey::Confirm => EntryFeedback::Committed(self.close(true)),
            EntryKey::Digit(digit) if digit <= 9 => self.push_digit(digit),
            EntryKey::Digit(_) => EntryFeedback::Ignored,
        }
    }

    /// Closes the entry, returning the clamped value when `commit` is set
    /// and something was typed.
    pub fn close(&mut self, commit: bool) -> Option<u16> {
        let value = if commit && !self.buffer.is_empty() {
            self.buffer
                .parse::<u64>()
                .ok()
                .map(|value| value.clamp(u64::from(self.min), u64::from(self.max)) as u16)
        } else {
            None
        };
        self.buffer.clear();
        self.replace_next = false;
        self.open = false;
        debug!(?value, "numeric entry closed");
        value
    }

    fn push_digit(&mut self, digit: u8) -> EntryFeedback {
        let digit = char::from(b'0' + digit);
        if self.replace_next {
            self.buffer.clear();
            self.replace_next = false;
        } else if self.buffer.len() >= self.max_digits() {
            return EntryFeedback::Ignored;
        }
        self.buffer.push(digit);
        let over = self
            .buffer
            .parse::<u64>()
            .map(|value| value > u64::from(self.max))
            .unwrap_or(false);
        if over {
            self.buffer = self.max.to_string();
            return EntryFeedback::Overflow;
        }
        EntryFeedback::Edited
    }

    fn max_digits(&self) -> usize {
        self.max.to_string().len()
    }
}
