//! On-device password entry, one letter at a time.
//!
//! PREV/NEXT scroll the letter at the write cursor through `A..=Z`;
//! SELECT commits it and moves on. Committing the last position finishes
//! the entry and yields the password.

use crate::config::PASSWORD_LEN;
use crate::ui::input_logic::{letter_next, letter_prev};

/// A finished WiFi password.
pub type Password = heapless::String<PASSWORD_LEN>;

/// Password buffer under construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialEntry {
    buf: [u8; PASSWORD_LEN],
    /// Write cursor, always `< PASSWORD_LEN`.
    char_index: usize,
    current_char: u8,
}

impl Default for CredentialEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialEntry {
    pub fn new() -> Self {
        let mut buf = [0u8; PASSWORD_LEN];
        buf[0] = b'A';
        Self {
            buf,
            char_index: 0,
            current_char: b'A',
        }
    }

    pub fn position(&self) -> usize {
        self.char_index
    }

    pub fn current_char(&self) -> char {
        self.current_char as char
    }

    pub fn scroll_prev(&mut self) {
        self.current_char = letter_prev(self.current_char);
        self.buf[self.char_index] = self.current_char;
    }

    pub fn scroll_next(&mut self) {
        self.current_char = letter_next(self.current_char);
        self.buf[self.char_index] = self.current_char;
    }

    /// Commit the letter under the cursor.
    ///
    /// Returns the finished password once the last position is committed;
    /// until then the cursor advances and the next letter starts at `A`.
    pub fn confirm(&mut self) -> Option<Password> {
        self.buf[self.char_index] = self.current_char;

        if self.char_index + 1 < PASSWORD_LEN {
            self.char_index += 1;
            self.current_char = b'A';
            self.buf[self.char_index] = self.current_char;
            None
        } else {
            let mut password = Password::new();
            for &b in &self.buf {
                let _ = password.push(b as char);
            }
            Some(password)
        }
    }

    /// Letters entered so far, including the one under edit.
    pub fn entered(&self) -> &str {
        // Only ASCII capitals are ever written.
        core::str::from_utf8(&self.buf[..=self.char_index]).unwrap_or("")
    }
}
