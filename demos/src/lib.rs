#![deny(warnings, clippy::all, clippy::pedantic)]

//! Command line front ends for `kway`.

use kway::{List, PieceStep};
use std::error::Error;
use std::fmt::{self, Display};
use std::num::{ParseFloatError, ParseIntError};
use tracing_subscriber::EnvFilter;

mod schedule;
mod shared_map;

/// The number of comma-separated fields of a piece record.
const PIECE_FIELDS: usize = 9;

/// [`ParseListError`] types.
#[derive(Debug)]
pub enum ParseListError {
    /// Value: an element is not an integer.
    Value {
        /// The offending element.
        input: String,
        /// The underlying error.
        source: ParseIntError,
    },
    /// Unsorted: the element at `position` is smaller than its predecessor.
    Unsorted {
        /// The position of the element.
        position: usize,
    },
}

/// [`ParsePieceError`] types.
#[derive(Debug)]
pub enum ParsePieceError {
    /// Fields: the record does not have the expected number of fields.
    Fields {
        /// The number of fields found.
        found: usize,
    },
    /// Number: a numeric field could not be parsed.
    Number {
        /// The name of the field.
        field: &'static str,
        /// The underlying error.
        source: ParseFloatError,
    },
}

impl Display for ParseListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseListError::Value { input, .. } => write!(f, "`{input}` is not an integer"),
            ParseListError::Unsorted { position } => {
                write!(f, "element {position} is smaller than the one before it")
            }
        }
    }
}

impl Error for ParseListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseListError::Value { source, .. } => Some(source),
            ParseListError::Unsorted { .. } => None,
        }
    }
}

impl Display for ParsePieceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePieceError::Fields { found } => {
                write!(f, "expected {PIECE_FIELDS} fields, found {found}")
            }
            ParsePieceError::Number { field, .. } => write!(f, "`{field}` is not a number"),
        }
    }
}

impl Error for ParsePieceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParsePieceError::Fields { .. } => None,
            ParsePieceError::Number { source, .. } => Some(source),
        }
    }
}

/// Installs a `tracing` subscriber writing to stderr, filtered by `RUST_LOG` (`info` by default).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
}

/// Parses a comma-separated, non-decreasing list of integers; the empty string is the empty list.
///
/// # Errors
///
/// Returns an error if an element is not an integer, or the elements are out of order.
pub fn parse_list(input: &str) -> Result<List<i64>, ParseListError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(List::new());
    }
    let values = input
        .split(',')
        .map(|v| {
            v.trim().parse::<i64>().map_err(|source| ParseListError::Value {
                input: v.trim().to_owned(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(position) = values.windows(2).position(|w| w[0] > w[1]) {
        return Err(ParseListError::Unsorted {
            position: position + 1,
        });
    }
    Ok(values.into_iter().collect())
}

/// Renders a list as `1 -> 1 -> 2`.
#[must_use]
pub fn render<T: Display>(list: &List<T>) -> String {
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Parses a piece record at position `sequence` of the casting order.
///
/// A record reads `id,width,thickness,inner grade,grade,min next,max next,min tolerated,max
/// tolerated`.
///
/// # Errors
///
/// Returns an error if the record has the wrong number of fields or a numeric field is malformed.
pub fn parse_piece(record: &str, sequence: usize) -> Result<PieceStep, ParsePieceError> {
    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    let &[id, width, thickness, inner_steel_grade, steel_grade, min_next, max_next, min_tolerated, max_tolerated] =
        fields.as_slice()
    else {
        return Err(ParsePieceError::Fields {
            found: fields.len(),
        });
    };
    let number = |field: &'static str, value: &str| {
        value
            .parse::<f64>()
            .map_err(|source| ParsePieceError::Number { field, source })
    };
    Ok(PieceStep {
        id: id.to_owned(),
        sequence,
        width: number("width", width)?,
        thickness: number("thickness", thickness)?,
        inner_steel_grade: inner_steel_grade.to_owned(),
        steel_grade: steel_grade.to_owned(),
        preferred_next: number("min next", min_next)?..=number("max next", max_next)?,
        tolerated_next: number("min tolerated", min_tolerated)?
            ..=number("max tolerated", max_tolerated)?,
    })
}

/// Returns the mean absolute thickness change between adjacent pieces, or zero for fewer than two
/// pieces.
#[must_use]
pub fn mean_thickness_change(pieces: &[PieceStep]) -> f64 {
    if pieces.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let transitions = (pieces.len() - 1) as f64;
    kway::total_thickness_change(pieces) / transitions
}
