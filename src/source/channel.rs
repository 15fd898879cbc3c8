//! Channel-based data source.
//!
//! Receives data bundles via a tokio watch channel. This is useful for
//! embedding the dashboard in a host application where bundles are pushed
//! rather than polled from disk.

use tokio::sync::watch;

use super::{DataBundle, DataSource};

/// A data source that receives bundles via a channel.
///
/// The producer (e.g. an ingestion pipeline) sends complete bundles
/// through the channel, and this source provides them to the TUI.
///
/// # Example
///
/// ```
/// use wardwatch::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("pipeline://analytics");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<DataBundle>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where bundles come from
    pub fn new(receiver: watch::Receiver<DataBundle>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending bundles to a ChannelSource.
    ///
    /// Returns (sender, source) where the sender can be used to push
    /// bundles and the source can be handed to the dashboard.
    pub fn create(source_description: &str) -> (watch::Sender<DataBundle>, Self) {
        let (tx, rx) = watch::channel(DataBundle::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<DataBundle> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // Check if there's a new value without blocking
        if self.receiver.has_changed().unwrap_or(false) {
            let bundle = self.receiver.borrow_and_update().clone();
            Some(bundle)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        // Channel sources don't have file-based errors; a dropped sender
        // simply stops producing new bundles.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::sample_bundle;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) bundle
        let bundle = source.poll();
        assert!(bundle.is_some());
        assert!(bundle.unwrap().catalog.is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new bundle
        tx.send(sample_bundle()).unwrap();

        // Now poll returns the new bundle
        let bundle = source.poll();
        assert!(bundle.is_some());
        assert_eq!(bundle.unwrap().catalog.len(), 1);
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("pipeline://analytics");
        assert_eq!(source.description(), "channel: pipeline://analytics");
    }
}
