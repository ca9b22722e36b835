//! User-facing notification and confirmation surfaces.

use std::fmt;
use std::sync::Mutex;

use crate::cart::price_display;

/// Shows a short, transient message to the user.
pub trait Notifier {
    /// Fire-and-forget.
    fn notify(&self, message: &str);
}

/// Shows a message the user must acknowledge. Used once, at checkout.
pub trait Confirmer {
    /// Fire-and-forget.
    fn confirm(&self, message: &str);
}

impl<F: Fn(&str)> Notifier for F {
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Messages the cart sends to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ItemAdded { name: String },
    ItemRemoved,
    OrderPlaced,
    SaveFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemAdded { name } => write!(f, "{} added to cart!", name),
            Self::ItemRemoved => write!(f, "Item removed from cart."),
            Self::OrderPlaced => write!(f, "Order placed successfully!"),
            Self::SaveFailed => write!(f, "Could not save your cart."),
        }
    }
}

/// Checkout confirmation text for an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub total_price: i64,
}

impl fmt::Display for OrderConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Thank you for your order!\nTotal: {}\n\nThis is a demo. In a real store, you would proceed to payment.",
            price_display(self.total_price)
        )
    }
}

/// Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, _message: &str) {}
}

impl Confirmer for Silent {
    fn confirm(&self, _message: &str) {}
}

/// Keeps every message it receives, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    messages: Mutex<Vec<String>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Drain and return the messages received so far.
    pub fn take(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }

    fn push(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

impl Notifier for Recorder {
    fn notify(&self, message: &str) {
        self.push(message);
    }
}

impl Confirmer for Recorder {
    fn confirm(&self, message: &str) {
        self.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        let added = Notice::ItemAdded {
            name: "Headset".to_string(),
        };
        assert_eq!(added.to_string(), "Headset added to cart!");
        assert_eq!(Notice::ItemRemoved.to_string(), "Item removed from cart.");
        assert_eq!(Notice::OrderPlaced.to_string(), "Order placed successfully!");
    }

    #[test]
    fn test_confirmation_text() {
        let text = OrderConfirmation { total_price: 35 }.to_string();
        assert!(text.starts_with("Thank you for your order!\nTotal: 35 DH\n"));
    }

    #[test]
    fn test_recorder_take_drains() {
        let recorder = Recorder::new();
        recorder.notify("a");
        recorder.confirm("b");
        assert_eq!(recorder.take(), vec!["a", "b"]);
        assert!(recorder.messages().is_empty());
    }

    #[test]
    fn test_closure_notifier() {
        let seen = Mutex::new(Vec::new());
        let notifier = |m: &str| seen.lock().unwrap().push(m.to_string());
        notifier.notify("hello");
        assert_eq!(*seen.lock().unwrap(), vec!["hello"]);
    }
}
