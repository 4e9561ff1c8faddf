use std::sync::Arc;

use tokio::sync::watch;

/// Shared "current token" slot read by outbound API calls.
///
/// Last writer wins. Cheap to clone; every clone sees the same slot.
/// Subscribers are woken on every change.
#[derive(Clone, Debug)]
pub struct TokenHolder {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl Default for TokenHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenHolder {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Store `token` (blank clears the slot). Returns `true` when the value changed.
    pub fn set_token(&self, token: Option<String>) -> bool {
        let token = token.filter(|t| !t.trim().is_empty());
        self.tx.send_if_modified(|current| {
            if *current == token {
                false
            } else {
                *current = token;
                true
            }
        })
    }

    pub fn get_token(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let holder = TokenHolder::new();
        let other = holder.clone();

        assert!(holder.set_token(Some("a".into())));
        assert_eq!(other.get_token().as_deref(), Some("a"));
    }

    #[test]
    fn unchanged_and_blank_values() {
        let holder = TokenHolder::new();
        assert!(holder.set_token(Some("a".into())));
        assert!(!holder.set_token(Some("a".into())));
        assert!(holder.set_token(Some("  ".into())));
        assert_eq!(holder.get_token(), None);
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let holder = TokenHolder::new();
        let mut rx = holder.subscribe();

        holder.set_token(Some("b".into()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("b"));
    }
}
