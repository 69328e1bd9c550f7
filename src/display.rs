//! Character display text buffer
//!
//! Holds the text for a 4x20 character display in fixed-capacity strings.
//! A pit message is wrapped into rows the next time the buffer is shown.
//! Drawing is left to a [`TextSink`] implemented by the firmware.

use heapless::String;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Number of display rows
pub const ROWS: usize = 4;

/// Characters per row
pub const COLUMNS: usize = 20;

/// Longest message that fits the display
pub const MESSAGE_CAPACITY: usize = ROWS * COLUMNS;

// Row indexing clamps to `ROWS - 1`
const _: () = assert!(ROWS > 0 && COLUMNS > 0);

pub type Line = String<COLUMNS>;
pub type Message = String<MESSAGE_CAPACITY>;

/// Destination for display text
///
/// Implement this for the physical display driver.
pub trait TextSink {
    /// Blank the whole display
    fn clear(&mut self);

    /// Print `text` at the start of `row`
    fn print_line(&mut self, row: usize, text: &str);
}

/// Text content of the display
#[derive(Debug, Clone)]
pub struct TextDisplay {
    message: Message,
    lines: [Line; ROWS],
    new_message: bool,
    responded: bool,
}

impl TextDisplay {
    pub const fn new() -> Self {
        Self {
            message: String::new(),
            lines: [const { String::new() }; ROWS],
            new_message: false,
            responded: true,
        }
    }

    /// Drop all text and forget any pending message
    pub fn reset(&mut self) {
        self.message.clear();
        for line in &mut self.lines {
            line.clear();
        }
        self.new_message = false;
        self.responded = true;
    }

    /// Store a new message to be wrapped on the next [`TextDisplay::show`]
    ///
    /// Text past [`MESSAGE_CAPACITY`] is dropped.
    pub fn set_message(&mut self, text: &str) {
        self.message.clear();
        push_truncated(&mut self.message, text, MESSAGE_CAPACITY);
        self.new_message = true;
        self.responded = false;

        #[cfg(feature = "esp32-log")]
        println!("[TextDisplay.set_message] {:?}", self.message.as_str());
    }

    /// Wrap the pending message into rows
    ///
    /// Does nothing unless a message arrived since the last layout.
    /// Returns true if the rows were rebuilt.
    pub fn layout(&mut self) -> bool {
        if !self.new_message {
            return false;
        }

        let mut chars = self.message.chars().peekable();
        for line in &mut self.lines {
            line.clear();
            let mut count = 0;
            // A char that does not fit in the row's bytes starts the next row
            while let Some(&ch) = chars.peek() {
                if count == COLUMNS || line.len() + ch.len_utf8() > line.capacity() {
                    break;
                }
                if line.push(ch).is_err() {
                    break;
                }
                chars.next();
                count += 1;
            }
        }
        self.new_message = false;
        true
    }

    /// Replace the text of `row`
    ///
    /// Text is cut at [`COLUMNS`]. Rows past the last one write to the last row.
    pub fn write_line(&mut self, row: usize, text: &str) {
        let line = &mut self.lines[row.min(ROWS - 1)];
        line.clear();
        push_truncated(line, text, COLUMNS);
    }

    /// Fill `row` with spaces
    pub fn clear_line(&mut self, row: usize) {
        let line = &mut self.lines[row.min(ROWS - 1)];
        line.clear();
        for _ in 0..COLUMNS {
            if line.push(' ').is_err() {
                break;
            }
        }
    }

    /// Send the current rows to `sink`
    ///
    /// A message that arrived since the last call is wrapped first and the
    /// sink is cleared once before printing.
    pub fn show<T: TextSink + ?Sized>(&mut self, sink: &mut T) {
        if self.layout() {
            sink.clear();
        }
        for (row, line) in self.lines.iter().enumerate() {
            sink.print_line(row, line.as_str());
        }
    }

    /// Text of `row`, or `None` past the last row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Text of every row, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Last message received, before wrapping
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Check if a message is waiting to be laid out
    pub const fn has_new_message(&self) -> bool {
        self.new_message
    }

    /// Record that the driver answered the current message
    pub fn mark_responded(&mut self) {
        self.responded = true;
    }

    /// Check if the driver answered the current message
    pub const fn is_responded(&self) -> bool {
        self.responded
    }
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Append up to `max_chars` characters of `text`, stopping when `target` is full
fn push_truncated<const N: usize>(target: &mut String<N>, text: &str, max_chars: usize) {
    for ch in text.chars().take(max_chars) {
        if target.push(ch).is_err() {
            break;
        }
    }
}
