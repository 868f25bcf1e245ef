//! Named-topic event bus

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// A bus subscriber. Subscribers compare by identity.
pub struct Subscriber {
    func: Rc<dyn Fn(&[Value])>,
}

impl Subscriber {
    /// Wrap a closure as a subscriber
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    pub fn call(&self, args: &[Value]) {
        (self.func)(args)
    }
}

impl Clone for Subscriber {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
        }
    }
}

impl PartialEq for Subscriber {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.func), Rc::as_ptr(&other.func))
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("func", &Rc::as_ptr(&self.func))
            .finish()
    }
}

/// Publish/subscribe registry keyed by topic name
#[derive(Default)]
pub struct EventBus {
    topics: RefCell<HashMap<String, Vec<Subscriber>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.topics())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `subscriber` to `topic`, creating the topic on first use
    pub fn subscribe(&self, topic: &str, subscriber: &Subscriber) {
        self.topics
            .borrow_mut()
            .entry(topic.to_string())
            .or_default()
            .push(subscriber.clone());
        log::debug!("subscribed to `{topic}`");
    }

    /// Remove every registration of `subscriber` from `topic`. The topic
    /// itself is kept even when it becomes empty.
    pub fn unsubscribe(&self, topic: &str, subscriber: &Subscriber) -> usize {
        let mut topics = self.topics.borrow_mut();
        let Some(subscribers) = topics.get_mut(topic) else {
            return 0;
        };
        let before = subscribers.len();
        subscribers.retain(|existing| existing != subscriber);
        before - subscribers.len()
    }

    /// Drop every subscriber of `topic`
    pub fn clear(&self, topic: &str) {
        self.topics
            .borrow_mut()
            .insert(topic.to_string(), Vec::new());
        log::debug!("cleared topic `{topic}`");
    }

    /// Call every subscriber of `topic` in subscription order.
    ///
    /// The subscriber list is fixed when the emit starts, so subscribing or
    /// unsubscribing from a callback applies to the next emit.
    pub fn emit(&self, topic: &str, args: &[Value]) {
        let subscribers = match self.topics.borrow().get(topic) {
            Some(subscribers) => subscribers.clone(),
            None => return,
        };
        log::trace!("emitting `{topic}` to {} subscriber(s)", subscribers.len());
        for subscriber in &subscribers {
            subscriber.call(args);
        }
    }

    /// Whether `topic` is known, even with no subscribers left
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.borrow().contains_key(topic)
    }

    /// Topic name to subscriber count, empty topics included
    pub fn topics(&self) -> BTreeMap<String, usize> {
        self.topics
            .borrow()
            .iter()
            .map(|(topic, subscribers)| (topic.clone(), subscribers.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> Subscriber {
        let log = log.clone();
        Subscriber::new(move |args| {
            let args = serde_json::to_string(args).unwrap();
            log.borrow_mut().push(format!("{name}:{args}"))
        })
    }

    #[test]
    fn test_emit_unknown_topic_is_noop() {
        let bus = EventBus::new();
        bus.emit("ready", &[]);
        assert!(!bus.has_topic("ready"));
    }

    #[test]
    fn test_emit_in_subscription_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe("ready", &recorder(&log, "a"));
        bus.subscribe("ready", &recorder(&log, "b"));

        bus.emit("ready", &[json!(1), json!("x")]);
        assert_eq!(
            *log.borrow(),
            vec![r#"a:[1,"x"]"#, r#"b:[1,"x"]"#]
        );
    }

    #[test]
    fn test_unsubscribe_keeps_topic() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&log, "a");
        bus.subscribe("ready", &a);
        bus.subscribe("ready", &a);

        assert_eq!(bus.unsubscribe("ready", &a), 2);
        assert_eq!(bus.unsubscribe("missing", &a), 0);
        assert!(bus.has_topic("ready"));
        assert_eq!(bus.topics()["ready"], 0);

        bus.emit("ready", &[]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_clear_creates_empty_topic() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe("a", &recorder(&log, "a"));
        bus.clear("a");
        bus.clear("b");

        assert_eq!(
            bus.topics().into_iter().collect::<Vec<_>>(),
            vec![("a".to_string(), 0), ("b".to_string(), 0)]
        );
    }

    #[test]
    fn test_subscribe_during_emit_applies_next_time() {
        let bus = Rc::new(EventBus::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let late = recorder(&log, "late");

        let weak = Rc::downgrade(&bus);
        bus.subscribe(
            "tick",
            &Subscriber::new(move |_| {
                if let Some(bus) = weak.upgrade() {
                    bus.subscribe("tick", &late);
                }
            }),
        );

        bus.emit("tick", &[]);
        assert!(log.borrow().is_empty());
        bus.emit("tick", &[]);
        assert_eq!(log.borrow().len(), 1);
    }
}
