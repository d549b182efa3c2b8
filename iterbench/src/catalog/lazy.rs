//! Pull-based iterator adapters
//!
//! A small adapter library in two flavours over one protocol:
//! - [`Cursor`]: the pull protocol (`next_item` until `None`)
//! - [`Adapter`] bridges any native [`Iterator`] onto the protocol
//! - [`filter`] / [`each`]: standalone helpers, statically dispatched
//! - [`iter`] returns a [`Lazy`] chain whose stages are boxed, so
//!   `iter(x).filter(p).each(f)` reads fluently at the cost of dynamic dispatch

/// Pull protocol shared by every adapter
pub trait Cursor {
    /// Element type
    type Item;

    /// Next element, or `None` once exhausted
    fn next_item(&mut self) -> Option<Self::Item>;
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    fn next_item(&mut self) -> Option<Self::Item> {
        (**self).next_item()
    }
}

/// Bridges a native iterator onto [`Cursor`]
#[derive(Debug, Clone)]
pub struct Adapter<I> {
    inner: I,
}

impl<I: Iterator> Adapter<I> {
    /// Wrap `source`
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            inner: source.into_iter(),
        }
    }
}

impl<I: Iterator> Cursor for Adapter<I> {
    type Item = I::Item;

    fn next_item(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Cursor yielding only the elements accepted by a predicate
#[derive(Debug, Clone)]
pub struct Filter<C, P> {
    source: C,
    predicate: P,
}

impl<C, P> Cursor for Filter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;

    fn next_item(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.source.next_item() {
            if (self.predicate)(&item) {
                return Some(item);
            }
        }
        None
    }
}

/// Filter `source` lazily with `predicate`
pub fn filter<C, P>(source: C, predicate: P) -> Filter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    Filter { source, predicate }
}

/// Drain `source`, calling `f` on every element
pub fn each<C, F>(mut source: C, mut f: F)
where
    C: Cursor,
    F: FnMut(C::Item),
{
    while let Some(item) = source.next_item() {
        f(item);
    }
}

/// Fluent, type-erased cursor chain
pub struct Lazy<'a, T> {
    cursor: Box<dyn Cursor<Item = T> + 'a>,
}

/// Start a [`Lazy`] chain over anything iterable
pub fn iter<'a, S>(source: S) -> Lazy<'a, S::Item>
where
    S: IntoIterator,
    S::IntoIter: 'a,
{
    Lazy {
        cursor: Box::new(Adapter::new(source)),
    }
}

impl<'a, T: 'a> Lazy<'a, T> {
    /// Keep only elements accepted by `predicate`
    pub fn filter<P>(self, predicate: P) -> Lazy<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        Lazy {
            cursor: Box::new(filter(self.cursor, predicate)),
        }
    }

    /// Drain the chain, calling `f` on every element
    pub fn each<F>(self, f: F)
    where
        F: FnMut(T),
    {
        each(self.cursor, f);
    }
}

impl<T> Cursor for Lazy<'_, T> {
    type Item = T;

    fn next_item(&mut self) -> Option<T> {
        self.cursor.next_item()
    }
}
