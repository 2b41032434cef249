//! Unbounded crossbeam channel carrying pipeline events to a front end.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Pipeline side of an event channel
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event; dropped silently once nobody is listening
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Front-end side of an event channel
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Blocking iterator that ends when every sender is gone
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Create a connected sender/receiver pair
pub fn channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();
    (
        EventSender { inner: sender },
        EventReceiver { inner: receiver },
    )
}

/// Sender for runs without a listener
pub fn null_sender() -> EventSender {
    channel().0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PipelineEvent, ScanEvent};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_cross_threads_in_order() {
        let (sender, receiver) = channel();

        thread::spawn(move || {
            sender.send(Event::Pipeline(PipelineEvent::Started));
            sender.send(Event::Scan(ScanEvent::Completed { total_entries: 25 }));
        })
        .join()
        .unwrap();

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(events[0], Event::Pipeline(PipelineEvent::Started)));
        assert!(matches!(
            events[1],
            Event::Scan(ScanEvent::Completed { total_entries: 25 })
        ));
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Scan(ScanEvent::Started {
            path: PathBuf::from("./raw_images"),
        }));
    }
}
