//! Pit message mailbox
//!
//! Bounded queue that hands decoded pit messages from the radio side (an
//! interrupt or another task) to the polling loop. Access is guarded by
//! `critical-section`, so senders may live in interrupt context.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{Deque, String};

use crate::display::MESSAGE_CAPACITY;

/// Message already decoded from the pit link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PitMessage {
    /// Text for the driver display
    Text(String<MESSAGE_CAPACITY>),
    /// Pit-side state of a car button (0 = cleared)
    Button { index: usize, state: u8 },
}

impl PitMessage {
    /// Build a text message, dropping anything past the display capacity
    pub fn text(text: &str) -> Self {
        let mut message = String::new();
        for ch in text.chars() {
            if message.push(ch).is_err() {
                break;
            }
        }
        Self::Text(message)
    }
}

/// Error returned when the mailbox is full; carries the rejected message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxFull(pub PitMessage);

/// Bounded, interrupt-safe pit message queue
pub struct Mailbox<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<PitMessage, SIZE>>>,
}

impl<const SIZE: usize> Mailbox<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for the producing side
    pub const fn sender(&self) -> MailboxSender<'_, SIZE> {
        MailboxSender { mailbox: self }
    }

    /// Handle for the polling loop
    pub const fn receiver(&self) -> MailboxReceiver<'_, SIZE> {
        MailboxReceiver { mailbox: self }
    }

    /// Queue a message, handing it back if the mailbox is full
    pub fn try_send(&self, message: PitMessage) -> Result<(), MailboxFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(message).map_err(MailboxFull)
        })
    }

    /// Take the oldest message, if any
    pub fn try_receive(&self) -> Option<PitMessage> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    /// Check if no message is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for Mailbox<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending handle for a [`Mailbox`]
#[derive(Clone, Copy)]
pub struct MailboxSender<'a, const SIZE: usize> {
    mailbox: &'a Mailbox<SIZE>,
}

impl<const SIZE: usize> MailboxSender<'_, SIZE> {
    pub fn try_send(&self, message: PitMessage) -> Result<(), MailboxFull> {
        self.mailbox.try_send(message)
    }
}

/// Receiving handle for a [`Mailbox`]
#[derive(Clone, Copy)]
pub struct MailboxReceiver<'a, const SIZE: usize> {
    mailbox: &'a Mailbox<SIZE>,
}

impl<const SIZE: usize> MailboxReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<PitMessage> {
        self.mailbox.try_receive()
    }
}
