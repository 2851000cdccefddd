//! [`List`] is an owned singly-linked sequence built out of [`ListNode`] instances.

use std::fmt::{self, Debug};
use std::iter::FusedIterator;

/// A node of a singly-linked sequence.
///
/// A node exclusively owns the rest of the sequence through `next`; splicing a sequence moves
/// the boxed nodes around without allocating new ones. Since `next` is a [`List`], dropping,
/// cloning, formatting or comparing a node visits its successors iteratively.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListNode<T> {
    /// The payload.
    pub value: T,

    /// The remainder of the sequence.
    pub next: List<T>,
}

/// [`List`] owns a singly-linked sequence of [`ListNode`] instances.
///
/// An empty [`List`] marks the empty sequence. [`List`] unlinks its nodes one by one when dropped,
/// so long sequences do not exhaust the stack.
pub struct List<T> {
    /// `head` points to the first node.
    pub(crate) head: Option<Box<ListNode<T>>>,
}

/// An iterator over the values of a [`List`].
pub struct Iter<'l, T> {
    current: Option<&'l ListNode<T>>,
}

/// An iterator that moves values out of a [`List`].
pub struct IntoIter<T> {
    list: List<T>,
}

impl<T> ListNode<T> {
    /// Creates a detached [`ListNode`].
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::ListNode;
    ///
    /// let node = ListNode::new(7);
    /// assert_eq!(node.value, 7);
    /// assert!(node.next.is_empty());
    /// ```
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            value,
            next: List::new(),
        }
    }

    /// Detaches and returns the remainder of the sequence.
    #[inline]
    pub fn take_next(&mut self) -> List<T> {
        List {
            head: self.next.head.take(),
        }
    }
}

impl<T> List<T> {
    /// Creates an empty [`List`].
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::List;
    ///
    /// let list: List<i32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Returns a reference to the first node.
    #[inline]
    pub fn head(&self) -> Option<&ListNode<T>> {
        self.head.as_deref()
    }

    /// Detaches the first node together with the rest of the sequence it owns.
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::List;
    ///
    /// let list: List<i32> = [3, 5].into_iter().collect();
    /// let head = list.into_head().unwrap();
    /// assert_eq!(head.value, 3);
    /// assert_eq!(head.next.head().map(|n| n.value), Some(5));
    /// ```
    #[inline]
    pub fn into_head(mut self) -> Option<Box<ListNode<T>>> {
        self.head.take()
    }

    /// Returns `true` if the [`List`] has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Counts the nodes.
    ///
    /// The sequence is traversed since nodes do not record the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::List;
    ///
    /// let list: List<i32> = [1, 4, 5].into_iter().collect();
    /// assert_eq!(list.len(), 3);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns an iterator over the values.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            current: self.head.as_deref(),
        }
    }

    /// Pops the first value.
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::List;
    ///
    /// let mut list: List<i32> = [2, 6].into_iter().collect();
    /// assert_eq!(list.pop_front(), Some(2));
    /// assert_eq!(list.pop_front(), Some(6));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.head.take().map(|mut node| {
            self.head = node.next.head.take();
            node.value
        })
    }

    /// Pushes a value in front of the first node.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        let mut node = Box::new(ListNode::new(value));
        node.next.head = self.head.take();
        self.head = Some(node);
    }
}

impl<T: Ord> List<T> {
    /// Returns `true` if the values are in non-decreasing order.
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::List;
    ///
    /// assert!([1, 1, 2].into_iter().collect::<List<i32>>().is_sorted());
    /// assert!(![2, 1].into_iter().collect::<List<i32>>().is_sorted());
    /// ```
    #[inline]
    pub fn is_sorted(&self) -> bool {
        let mut iter = self.iter();
        let Some(mut prev) = iter.next() else {
            return true;
        };
        for value in iter {
            if prev > value {
                return false;
            }
            prev = value;
        }
        true
    }
}

impl<T: Clone> Clone for List<T> {
    #[inline]
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: Debug> Debug for List<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(" -> ")?;
            }
            value.fmt(f)?;
        }
        f.write_str("]")
    }
}

impl<T> Default for List<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for List<T> {
    #[inline]
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(mut node) = current {
            current = node.next.head.take();
        }
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T> From<Box<ListNode<T>>> for List<T> {
    #[inline]
    fn from(node: Box<ListNode<T>>) -> Self {
        Self { head: Some(node) }
    }
}

impl<T> From<Option<Box<ListNode<T>>>> for List<T> {
    #[inline]
    fn from(head: Option<Box<ListNode<T>>>) -> Self {
        Self { head }
    }
}

impl<T> FromIterator<T> for List<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut head = None;
        let mut tail = &mut head;
        for value in iter {
            let node = tail.insert(Box::new(ListNode::new(value)));
            tail = &mut node.next.head;
        }
        Self { head }
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'l, T> IntoIterator for &'l List<T> {
    type Item = &'l T;
    type IntoIter = Iter<'l, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("current", &self.current.map(|n| &n.value))
            .finish()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'l, T> Iterator for Iter<'l, T> {
    type Item = &'l T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current) = self.current {
            self.current = current.next.head.as_deref();
            Some(&current.value)
        } else {
            None
        }
    }
}

impl<T: Debug> Debug for IntoIter<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }
}
