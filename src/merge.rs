//! K-way merge of ordered [`List`] sequences.
//!
//! Every function here consumes its inputs and re-links the existing nodes; nothing is allocated
//! for the output sequence.

use super::list::{List, ListNode};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;
use tracing::debug;

/// [`Strategy`] selects how k sequences are reduced to one.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Strategy {
    /// Keeps the heads of all the sequences in a min-heap; see [`merge_k_lists`].
    #[default]
    Heap,
    /// Merges sequences two at a time, halving their number each round; see
    /// [`merge_k_lists_pairwise`].
    Pairwise,
}

/// The error returned when parsing an unknown [`Strategy`] name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseStrategyError {
    name: String,
}

/// A sequence head waiting in the heap, tagged with the position of its input sequence.
struct HeapEntry<T> {
    node: Box<ListNode<T>>,
    source: usize,
}

impl Strategy {
    /// Merges the sequences according to the selected [`Strategy`].
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::{List, Strategy};
    ///
    /// let lists: Vec<List<i32>> = vec![
    ///     [1, 4, 5].into_iter().collect(),
    ///     [1, 3, 4].into_iter().collect(),
    ///     [2, 6].into_iter().collect(),
    /// ];
    /// let merged = Strategy::Pairwise.merge(lists);
    /// assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![1, 1, 2, 3, 4, 4, 5, 6]);
    /// ```
    #[inline]
    pub fn merge<T: Ord, I: IntoIterator<Item = List<T>>>(self, lists: I) -> List<T> {
        match self {
            Strategy::Heap => merge_k_lists(lists),
            Strategy::Pairwise => merge_k_lists_pairwise(lists),
        }
    }
}

impl Display for Strategy {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Heap => f.write_str("heap"),
            Strategy::Pairwise => f.write_str("pairwise"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("heap") => Ok(Strategy::Heap),
            s if s.eq_ignore_ascii_case("pairwise") => Ok(Strategy::Pairwise),
            _ => Err(ParseStrategyError {
                name: s.to_owned(),
            }),
        }
    }
}

impl Display for ParseStrategyError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown merge strategy `{}`, expected `heap` or `pairwise`",
            self.name
        )
    }
}

impl Error for ParseStrategyError {}

impl<T: Ord> Ord for HeapEntry<T> {
    // `BinaryHeap` is a max-heap; the order is reversed so that the smallest value, and then the
    // earliest input, is popped first.
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .value
            .cmp(&self.node.value)
            .then_with(|| other.source.cmp(&self.source))
    }
}

impl<T: Ord> PartialOrd for HeapEntry<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> PartialEq for HeapEntry<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Ord> Eq for HeapEntry<T> {}

/// Merges k ordered sequences into one ordered sequence using a min-heap.
///
/// The heads of all non-empty sequences are kept in a heap of at most k entries; the smallest one
/// is repeatedly detached, appended to the output, and replaced with its successor. Equal values
/// are emitted in input order, so the merge is stable. Runs in `O(N log k)`.
///
/// Returns an empty [`List`] if there are no sequences or all of them are empty.
///
/// # Examples
///
/// ```
/// use kway::{merge_k_lists, List};
///
/// let lists: Vec<List<i32>> = vec![
///     [1, 4, 5].into_iter().collect(),
///     [1, 3, 4].into_iter().collect(),
///     [2, 6].into_iter().collect(),
/// ];
/// let merged = merge_k_lists(lists);
/// assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![1, 1, 2, 3, 4, 4, 5, 6]);
///
/// assert!(merge_k_lists::<i32, _>(Vec::new()).is_empty());
/// ```
pub fn merge_k_lists<T: Ord, I: IntoIterator<Item = List<T>>>(lists: I) -> List<T> {
    let mut heap: BinaryHeap<HeapEntry<T>> = lists
        .into_iter()
        .enumerate()
        .filter_map(|(source, list)| list.into_head().map(|node| HeapEntry { node, source }))
        .collect();
    debug!(sequences = heap.len(), "heap merge");

    let mut head = None;
    let mut tail = &mut head;
    while let Some(HeapEntry { mut node, source }) = heap.pop() {
        if let Some(next) = node.next.head.take() {
            heap.push(HeapEntry { node: next, source });
        }
        tail = &mut tail.insert(node).next.head;
    }
    List::from(head)
}

/// Merges k ordered sequences by merging them two at a time.
///
/// Adjacent sequences are paired and merged with [`merge_two_lists`] until one is left, which
/// keeps the merge stable and bounds the work by `O(N log k)`.
///
/// # Examples
///
/// ```
/// use kway::{merge_k_lists_pairwise, List};
///
/// let lists = vec![List::new(), [2, 2].into_iter().collect(), List::new()];
/// let merged = merge_k_lists_pairwise(lists);
/// assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![2, 2]);
/// ```
pub fn merge_k_lists_pairwise<T: Ord, I: IntoIterator<Item = List<T>>>(lists: I) -> List<T> {
    let mut lists: Vec<List<T>> = lists.into_iter().collect();
    debug!(sequences = lists.len(), "pairwise merge");

    while lists.len() > 1 {
        let mut merged = Vec::with_capacity((lists.len() + 1) / 2);
        let mut iter = lists.into_iter();
        while let Some(first) = iter.next() {
            merged.push(match iter.next() {
                Some(second) => merge_two_lists(first, second),
                None => first,
            });
        }
        lists = merged;
    }
    lists.pop().unwrap_or_default()
}

/// Merges two ordered sequences.
///
/// On equal values the node from `first` goes first.
///
/// # Examples
///
/// ```
/// use kway::{merge_two_lists, List};
///
/// let first: List<i32> = [1, 2, 4].into_iter().collect();
/// let second: List<i32> = [1, 3, 4].into_iter().collect();
/// let merged = merge_two_lists(first, second);
/// assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![1, 1, 2, 3, 4, 4]);
/// ```
pub fn merge_two_lists<T: Ord>(first: List<T>, second: List<T>) -> List<T> {
    let (mut first, mut second) = (first.into_head(), second.into_head());
    let mut head = None;
    let mut tail = &mut head;
    loop {
        let take_second = match (&first, &second) {
            (Some(a), Some(b)) => b.value < a.value,
            _ => break,
        };
        let source = if take_second {
            &mut second
        } else {
            &mut first
        };
        if let Some(mut node) = source.take() {
            *source = node.next.head.take();
            tail = &mut tail.insert(node).next.head;
        }
    }
    *tail = first.or(second);
    List::from(head)
}

impl<T: Ord> List<T> {
    /// Merges ordered [`List`] instances into one with [`Strategy::Heap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::List;
    ///
    /// let merged = List::merge_k(vec![
    ///     [1, 4, 5].into_iter().collect(),
    ///     [1, 3, 4].into_iter().collect(),
    ///     [2, 6].into_iter().collect(),
    /// ]);
    /// assert_eq!(format!("{merged:?}"), "[1 -> 1 -> 2 -> 3 -> 4 -> 4 -> 5 -> 6]");
    /// ```
    #[inline]
    pub fn merge_k<I: IntoIterator<Item = List<T>>>(lists: I) -> Self {
        Self::merge_k_with(Strategy::default(), lists)
    }

    /// Merges ordered [`List`] instances into one with the given [`Strategy`].
    #[inline]
    pub fn merge_k_with<I: IntoIterator<Item = List<T>>>(strategy: Strategy, lists: I) -> Self {
        strategy.merge(lists)
    }
}
