use async_trait::async_trait;
use divscan_core::notify::{Notifier, NotifyError};

/// Prints scan messages to stdout.
#[derive(Debug, Copy, Clone, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        println!("{message}");
        Ok(())
    }
}
