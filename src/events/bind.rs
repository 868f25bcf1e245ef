//! Receiver-bound handlers
//!
//! [`bind`] turns a method of a shared receiver into a [`Handler`] that
//! always runs against that receiver. Types implementing [`Bindable`] list
//! their handler methods by name so [`bind_all`] can bind several at once.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::events::{DelegatedEvent, Handler};
use crate::Error;

/// A handler method of `T`
pub type Method<T, N> = fn(&T, &DelegatedEvent<'_, N>) -> anyhow::Result<()>;

/// A type exposing named handler methods
pub trait Bindable<N>: Sized + 'static {
    /// Every bindable method, in declaration order
    fn methods() -> Vec<(&'static str, Method<Self, N>)>;
}

/// Bind `method` to `receiver`
pub fn bind<T, N>(receiver: &Rc<T>, method: Method<T, N>) -> Handler<N>
where
    T: 'static,
    N: 'static,
{
    let receiver = receiver.clone();
    Handler::new(move |event| method(&receiver, event))
}

/// Bind the methods named in `names`, or every method `T` declares when no
/// names are given.
///
/// Fails with [`Error::UnknownMethod`] on the first name `T` does not declare.
pub fn bind_all<T, N>(
    receiver: &Rc<T>,
    names: Option<&[&str]>,
) -> Result<BTreeMap<&'static str, Handler<N>>, Error>
where
    T: Bindable<N>,
    N: 'static,
{
    let methods = T::methods();
    let selected: Vec<(&'static str, Method<T, N>)> = match names {
        None => methods,
        Some(names) => names
            .iter()
            .map(|name| {
                methods
                    .iter()
                    .find(|(declared, _)| declared == name)
                    .copied()
                    .ok_or_else(|| Error::UnknownMethod(name.to_string()))
            })
            .collect::<Result<_, _>>()?,
    };

    Ok(selected
        .into_iter()
        .map(|(name, method)| (name, bind(receiver, method)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DomEvent;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        clicks: Cell<u32>,
        resets: Cell<u32>,
    }

    impl Counter {
        fn click(&self, _event: &DelegatedEvent<'_, u32>) -> anyhow::Result<()> {
            self.clicks.set(self.clicks.get() + 1);
            Ok(())
        }

        fn reset(&self, _event: &DelegatedEvent<'_, u32>) -> anyhow::Result<()> {
            self.resets.set(self.resets.get() + 1);
            self.clicks.set(0);
            Ok(())
        }
    }

    impl Bindable<u32> for Counter {
        fn methods() -> Vec<(&'static str, Method<Self, u32>)> {
            vec![
                ("click", Counter::click as Method<Self, u32>),
                ("reset", Counter::reset as Method<Self, u32>),
            ]
        }
    }

    fn fire(handler: &Handler<u32>) {
        let event = DomEvent::new("click", 1u32);
        handler
            .call(&DelegatedEvent {
                original_event: &event,
                delegated_target: 1,
            })
            .unwrap();
    }

    #[test]
    fn test_bind_keeps_receiver() {
        let counter = Rc::new(Counter::default());
        let handler = bind(&counter, Counter::click);
        fire(&handler);
        fire(&handler);
        assert_eq!(counter.clicks.get(), 2);
    }

    #[test]
    fn test_bind_all_without_names() {
        let counter = Rc::new(Counter::default());
        let bound = bind_all(&counter, None).unwrap();
        assert_eq!(bound.keys().copied().collect::<Vec<_>>(), vec!["click", "reset"]);

        fire(&bound["click"]);
        fire(&bound["reset"]);
        assert_eq!(counter.clicks.get(), 0);
        assert_eq!(counter.resets.get(), 1);
    }

    #[test]
    fn test_bind_all_selected_names() {
        let counter = Rc::new(Counter::default());
        let bound = bind_all(&counter, Some(&["reset"][..])).unwrap();
        assert_eq!(bound.len(), 1);
        assert!(bound.contains_key("reset"));

        assert!(matches!(
            bind_all(&counter, Some(&["click", "missing"][..])),
            Err(Error::UnknownMethod(name)) if name == "missing"
        ));
    }
}
