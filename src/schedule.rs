//! Rolling-order planning of coils ([`PieceStep`]) for smooth thickness transitions.
//!
//! Pieces arrive in casting order. Consecutive pieces of the same inner steel grade form a group;
//! planning may reorder pieces within a group and move thinner pieces of a grade into its earlier
//! groups, but never moves a piece into a group of another grade.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Display};
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::debug;

/// Thickness differences up to this value count as no change.
const SAME_THICKNESS: f64 = 0.001;

/// [`PieceStep`] is one coil to be rolled.
#[derive(Clone, Debug, PartialEq)]
pub struct PieceStep {
    /// The identifier of the piece.
    pub id: String,

    /// The position of the piece in the casting order.
    pub sequence: usize,

    /// The width.
    pub width: f64,

    /// The thickness.
    pub thickness: f64,

    /// The inner steel grade; consecutive pieces of the same grade form a group.
    pub inner_steel_grade: String,

    /// The steel grade.
    pub steel_grade: String,

    /// Thicknesses the next piece should have.
    pub preferred_next: RangeInclusive<f64>,

    /// Thicknesses the next piece may have at a higher cost.
    pub tolerated_next: RangeInclusive<f64>,
}

/// [`Sequencing`] selects how the groups of a schedule are laid out.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Sequencing {
    /// Keeps each group in thickness order and picks its direction; see
    /// [`smooth_transitions`].
    #[default]
    Orientation,
    /// Picks the first and last piece of each group and fills in the rest by nearest neighbour;
    /// see [`plan_transitions`].
    Endpoints,
}

/// The error returned when parsing an unknown [`Sequencing`] name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSequencingError {
    name: String,
}

impl PieceStep {
    /// Creates a [`PieceStep`] that accepts any thickness after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::PieceStep;
    ///
    /// let piece = PieceStep::new("P1", 0, 1500.0, 4.0, "Q235");
    /// assert_eq!(piece.steel_grade, "Q235");
    /// assert!(piece.preferred_next.contains(&12.0));
    /// ```
    pub fn new(id: &str, sequence: usize, width: f64, thickness: f64, grade: &str) -> Self {
        Self {
            id: id.to_owned(),
            sequence,
            width,
            thickness,
            inner_steel_grade: grade.to_owned(),
            steel_grade: grade.to_owned(),
            preferred_next: 0.0..=f64::MAX,
            tolerated_next: 0.0..=f64::MAX,
        }
    }

    /// The piece a schedule is assumed to follow.
    fn virtual_start(first_group: &[PieceStep]) -> Self {
        let width = first_group.first().map_or(1800.0, |p| p.width);
        Self {
            preferred_next: 0.0..=50.0,
            tolerated_next: 0.0..=100.0,
            ..Self::new("", 0, width, 5.75, "Q355B-1")
        }
    }
}

impl Sequencing {
    /// Plans the rolling order of `pieces` according to the selected [`Sequencing`].
    ///
    /// The pieces are split into grade groups with [`split_by_grade`], thinner pieces are moved
    /// forward with [`thin_first`], and the groups are laid out.
    ///
    /// # Examples
    ///
    /// ```
    /// use kway::{PieceStep, Sequencing};
    ///
    /// let pieces = vec![
    ///     PieceStep::new("a", 0, 1500.0, 6.0, "A"),
    ///     PieceStep::new("b", 1, 1500.0, 4.0, "A"),
    ///     PieceStep::new("c", 2, 1500.0, 9.0, "B"),
    /// ];
    /// let planned = Sequencing::Orientation.plan(pieces);
    /// let ids: Vec<_> = planned.iter().map(|p| p.id.as_str()).collect();
    /// assert_eq!(ids, ["b", "a", "c"]);
    /// ```
    pub fn plan(self, pieces: Vec<PieceStep>) -> Vec<PieceStep> {
        let groups = thin_first(split_by_grade(pieces));
        match self {
            Sequencing::Orientation => smooth_transitions(groups),
            Sequencing::Endpoints => plan_transitions(groups),
        }
    }
}

impl Display for Sequencing {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequencing::Orientation => f.write_str("orientation"),
            Sequencing::Endpoints => f.write_str("endpoints"),
        }
    }
}

impl FromStr for Sequencing {
    type Err = ParseSequencingError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("orientation") => Ok(Sequencing::Orientation),
            s if s.eq_ignore_ascii_case("endpoints") => Ok(Sequencing::Endpoints),
            _ => Err(ParseSequencingError {
                name: s.to_owned(),
            }),
        }
    }
}

impl Display for ParseSequencingError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown sequencing `{}`, expected `orientation` or `endpoints`",
            self.name
        )
    }
}

impl Error for ParseSequencingError {}

/// Splits `pieces` into runs of consecutive pieces sharing an inner steel grade.
///
/// A grade may appear in more than one run if other grades interrupt it.
///
/// # Examples
///
/// ```
/// use kway::{split_by_grade, PieceStep};
///
/// let pieces = ["A", "A", "B", "A"]
///     .iter()
///     .enumerate()
///     .map(|(i, g)| PieceStep::new(&i.to_string(), i, 1500.0, 4.0, g))
///     .collect();
/// let sizes: Vec<_> = split_by_grade(pieces).iter().map(Vec::len).collect();
/// assert_eq!(sizes, [2, 1, 1]);
/// ```
pub fn split_by_grade(pieces: Vec<PieceStep>) -> Vec<Vec<PieceStep>> {
    let mut groups: Vec<Vec<PieceStep>> = Vec::new();
    for piece in pieces {
        match groups.last_mut() {
            Some(group) if group[0].inner_steel_grade == piece.inner_steel_grade => {
                group.push(piece);
            }
            _ => groups.push(vec![piece]),
        }
    }
    groups
}

/// Redistributes the pieces of each grade across its groups so that earlier groups get the
/// thinner pieces.
///
/// Group sizes are kept; within a grade the pieces end up in non-decreasing thickness order.
pub fn thin_first(groups: Vec<Vec<PieceStep>>) -> Vec<Vec<PieceStep>> {
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    let mut by_grade: HashMap<String, Vec<PieceStep>> = HashMap::new();
    let mut grades = Vec::with_capacity(groups.len());
    for group in groups {
        let grade = group.first().map(|p| p.inner_steel_grade.clone());
        if let Some(grade) = &grade {
            by_grade.entry(grade.clone()).or_default().extend(group);
        }
        grades.push(grade);
    }

    // Reversed so that the thinnest piece is popped first.
    for pieces in by_grade.values_mut() {
        pieces.sort_by(|a, b| {
            b.thickness
                .total_cmp(&a.thickness)
                .then(b.sequence.cmp(&a.sequence))
        });
    }
    grades
        .into_iter()
        .zip(sizes)
        .map(|(grade, size)| match grade.and_then(|g| by_grade.get_mut(&g)) {
            Some(pieces) => (0..size).filter_map(|_| pieces.pop()).collect(),
            None => Vec::new(),
        })
        .collect()
}

/// Lays out the groups in order, running each one either forwards or backwards so that the sum of
/// squared thickness jumps between groups is minimal.
///
/// Empty groups are skipped. On equal cost the last group runs forwards.
///
/// # Examples
///
/// ```
/// use kway::{smooth_transitions, PieceStep};
///
/// let group = |grade: &str, thicknesses: &[f64]| -> Vec<PieceStep> {
///     thicknesses
///         .iter()
///         .map(|&t| PieceStep::new(grade, 0, 1500.0, t, grade))
///         .collect()
/// };
/// let planned = smooth_transitions(vec![group("A", &[2.0, 8.0]), group("B", &[3.0, 9.0])]);
/// let thicknesses: Vec<f64> = planned.iter().map(|p| p.thickness).collect();
/// assert_eq!(thicknesses, [8.0, 2.0, 3.0, 9.0]);
/// ```
pub fn smooth_transitions(groups: Vec<Vec<PieceStep>>) -> Vec<PieceStep> {
    let groups: Vec<Vec<PieceStep>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    debug!(groups = groups.len(), "smoothing transitions");

    // `cost[d]` is the best cost of the groups so far with the last one run in direction `d`,
    // where `d == 1` means reversed; `from[i][d]` is the direction of group `i - 1` it came from.
    let ends = |group: &[PieceStep], reversed: bool| {
        let (first, last) = (group[0].thickness, group[group.len() - 1].thickness);
        if reversed {
            (last, first)
        } else {
            (first, last)
        }
    };
    let mut cost = [0.0_f64; 2];
    let mut from = vec![[0_usize; 2]; groups.len()];
    for i in 1..groups.len() {
        let mut next = [f64::MAX; 2];
        for d in 0..2 {
            let (entry, _) = ends(&groups[i], d == 1);
            for (p, prev_cost) in cost.iter().enumerate() {
                let (_, exit) = ends(&groups[i - 1], p == 1);
                let total = prev_cost + (exit - entry).powi(2);
                if total < next[d] {
                    next[d] = total;
                    from[i][d] = p;
                }
            }
        }
        cost = next;
    }

    let mut directions = vec![false; groups.len()];
    let mut d = usize::from(cost[1] < cost[0]);
    for i in (0..groups.len()).rev() {
        directions[i] = d == 1;
        d = from[i][d];
    }
    groups
        .into_iter()
        .zip(directions)
        .flat_map(|(mut group, reversed)| {
            if reversed {
                group.reverse();
            }
            group
        })
        .collect()
}

/// Returns the cost of rolling `to` right after `from`.
///
/// Thickness jumps inside the preferred window of `from` cost their size, jumps inside the
/// tolerated window five times that, and anything else is heavily penalized. Width and grade
/// changes add a fixed cost.
///
/// # Examples
///
/// ```
/// use kway::{transition_cost, PieceStep};
///
/// let mut from = PieceStep::new("a", 0, 1500.0, 4.0, "A");
/// from.preferred_next = 3.0..=5.0;
/// from.tolerated_next = 2.0..=8.0;
///
/// assert_eq!(transition_cost(&from, &PieceStep::new("b", 1, 1500.0, 5.0, "A")), 1.0);
/// assert_eq!(transition_cost(&from, &PieceStep::new("c", 2, 1500.0, 6.0, "A")), 10.0);
/// assert_eq!(transition_cost(&from, &PieceStep::new("d", 3, 1200.0, 4.0, "B")), 60.0);
/// ```
pub fn transition_cost(from: &PieceStep, to: &PieceStep) -> f64 {
    let diff = (from.thickness - to.thickness).abs();
    let thickness_cost = if diff <= SAME_THICKNESS {
        0.0
    } else if from.preferred_next.contains(&to.thickness) {
        diff
    } else if from.tolerated_next.contains(&to.thickness) {
        diff * 5.0
    } else {
        diff * 20.0 + 100.0
    };

    let mut change_cost = 0.0;
    if from.width.total_cmp(&to.width) != Ordering::Equal {
        change_cost += 10.0;
    }
    if from.inner_steel_grade != to.inner_steel_grade {
        change_cost += 50.0;
    }
    thickness_cost + change_cost
}

/// Greedily picks the first and last piece of every group, as indices into the group.
///
/// The first piece of a group is chosen against the last piece of the previous group, or against
/// a virtual start piece for the first group; the last piece is chosen against the cheapest entry
/// into the next group. Empty groups yield `None`.
pub fn select_endpoints(groups: &[Vec<PieceStep>]) -> Vec<Option<(usize, usize)>> {
    let virtual_start = PieceStep::virtual_start(groups.first().map_or(&[][..], Vec::as_slice));
    let mut selections = Vec::with_capacity(groups.len());
    let mut previous = &virtual_start;
    for (i, group) in groups.iter().enumerate() {
        let next_group = groups.get(i + 1).map_or(&[][..], Vec::as_slice);
        let mut best: Option<((usize, usize), f64)> = None;
        for (s, start) in group.iter().enumerate() {
            let start_cost = transition_cost(previous, start);
            for (e, end) in group.iter().enumerate() {
                let end_cost = next_group
                    .iter()
                    .map(|n| transition_cost(end, n))
                    .min_by(f64::total_cmp)
                    .unwrap_or(0.0);
                let total = start_cost + end_cost;
                if best.map_or(true, |(_, cost)| total < cost) {
                    best = Some(((s, e), total));
                }
            }
        }
        let selection = best.map(|(selection, _)| selection);
        if let Some((_, e)) = selection {
            previous = &group[e];
        }
        selections.push(selection);
    }
    selections
}

/// Orders `group` to start at index `start` and end at index `end`, visiting the pieces in
/// between by nearest neighbour under [`transition_cost`].
///
/// Groups of at most two pieces are returned as they are. If `start == end` the piece is visited
/// once, first.
///
/// # Examples
///
/// ```
/// use kway::{order_with_endpoints, PieceStep};
///
/// let group: Vec<PieceStep> = [5.0, 1.0, 3.0, 2.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &t)| PieceStep::new(&i.to_string(), i, 1500.0, t, "A"))
///     .collect();
/// let ordered = order_with_endpoints(group, 1, 0);
/// let thicknesses: Vec<f64> = ordered.iter().map(|p| p.thickness).collect();
/// assert_eq!(thicknesses, [1.0, 2.0, 3.0, 5.0]);
/// ```
pub fn order_with_endpoints(group: Vec<PieceStep>, start: usize, end: usize) -> Vec<PieceStep> {
    if group.len() <= 2 || start >= group.len() || end >= group.len() {
        return group;
    }
    let mut slots: Vec<Option<PieceStep>> = group.into_iter().map(Some).collect();
    let (Some(first), last) = (slots[start].take(), slots[end].take()) else {
        return slots.into_iter().flatten().collect();
    };

    let mut ordered = Vec::with_capacity(slots.len());
    ordered.push(first);
    loop {
        let Some(current) = ordered.last() else {
            break;
        };
        let nearest = slots
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (i, transition_cost(current, p))))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i);
        match nearest.and_then(|i| slots[i].take()) {
            Some(piece) => ordered.push(piece),
            None => break,
        }
    }
    ordered.extend(last);
    ordered
}

/// Lays out the groups in order using [`select_endpoints`] and [`order_with_endpoints`].
///
/// A single group is instead sorted by thickness.
pub fn plan_transitions(groups: Vec<Vec<PieceStep>>) -> Vec<PieceStep> {
    debug!(groups = groups.len(), "planning transitions");
    if groups.len() == 1 {
        return groups
            .into_iter()
            .flat_map(|mut group| {
                if group.len() > 2 {
                    group.sort_by(|a, b| a.thickness.total_cmp(&b.thickness));
                }
                group
            })
            .collect();
    }
    let selections = select_endpoints(&groups);
    groups
        .into_iter()
        .zip(selections)
        .flat_map(|(group, selection)| match selection {
            Some((start, end)) => order_with_endpoints(group, start, end),
            None => group,
        })
        .collect()
}

/// Returns the sum of absolute thickness differences between adjacent pieces.
///
/// # Examples
///
/// ```
/// use kway::{total_thickness_change, PieceStep};
///
/// let pieces: Vec<PieceStep> = [4.0, 6.0, 3.0]
///     .iter()
///     .map(|&t| PieceStep::new("p", 0, 1500.0, t, "A"))
///     .collect();
/// assert_eq!(total_thickness_change(&pieces), 5.0);
/// ```
pub fn total_thickness_change(pieces: &[PieceStep]) -> f64 {
    pieces
        .windows(2)
        .map(|w| (w[0].thickness - w[1].thickness).abs())
        .sum()
}
