#[cfg(test)]
mod examples {
    use crate::{mean_thickness_change, parse_piece, ParsePieceError};
    use kway::Sequencing;

    const PIECES: &str = "\
        C1, 1500, 8.0, A, A1, 6, 10, 4, 12
        C2, 1500, 2.0, A, A1, 1, 3, 0, 5
        C3, 1500, 6.0, A, A1, 5, 7, 3, 9
        C4, 1800, 9.0, B, B1, 8, 10, 6, 12
        C5, 1800, 3.0, B, B1, 2, 4, 0, 6";

    #[test]
    fn plan_records() {
        let pieces = PIECES
            .lines()
            .enumerate()
            .map(|(i, l)| parse_piece(l, i))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(pieces[1].id, "C2");
        assert_eq!(pieces[1].sequence, 1);
        assert_eq!(pieces[1].preferred_next, 1.0..=3.0);
        assert_eq!(pieces[3].tolerated_next, 6.0..=12.0);

        let before = mean_thickness_change(&pieces);
        for sequencing in [Sequencing::Orientation, Sequencing::Endpoints] {
            let planned = sequencing.plan(pieces.clone());
            assert_eq!(planned.len(), 5);
            assert!(mean_thickness_change(&planned) < before, "{sequencing}");
        }
    }

    #[test]
    fn rejects_bad_records() {
        assert!(matches!(
            parse_piece("C1, 1500, 8.0", 0),
            Err(ParsePieceError::Fields { found: 3 })
        ));
        let err = parse_piece("C1, 1500, thick, A, A1, 6, 10, 4, 12", 0).unwrap_err();
        assert_eq!(err.to_string(), "`thickness` is not a number");
        assert!(std::error::Error::source(&err).is_some());
        assert!(mean_thickness_change(&[]).abs() < f64::EPSILON);
    }
}
