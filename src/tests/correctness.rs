mod merge_test {
    use crate::{merge_k_lists, merge_k_lists_pairwise, List};
    use proptest::collection::vec;
    use proptest::prelude::*;
    use rand::Rng;

    fn sorted_lists() -> impl Strategy<Value = Vec<Vec<i32>>> {
        vec(vec(-64_i32..64, 0..32), 0..16).prop_map(|mut lists| {
            lists.iter_mut().for_each(|l| l.sort_unstable());
            lists
        })
    }

    fn to_lists(lists: &[Vec<i32>]) -> Vec<List<i32>> {
        lists.iter().map(|l| l.iter().copied().collect()).collect()
    }

    proptest! {
        #[cfg_attr(miri, ignore)]
        #[test]
        fn heap_merge(lists in sorted_lists()) {
            let mut expected: Vec<i32> = lists.iter().flatten().copied().collect();
            expected.sort_unstable();

            let merged = merge_k_lists(to_lists(&lists));
            prop_assert_eq!(merged.len(), expected.len());
            prop_assert!(merged.is_sorted());
            prop_assert_eq!(merged.into_iter().collect::<Vec<_>>(), expected);
        }

        #[cfg_attr(miri, ignore)]
        #[test]
        fn pairwise_merge(lists in sorted_lists()) {
            let mut expected: Vec<i32> = lists.iter().flatten().copied().collect();
            expected.sort_unstable();

            let merged = merge_k_lists_pairwise(to_lists(&lists));
            prop_assert_eq!(merged.len(), expected.len());
            prop_assert!(merged.is_sorted());
            prop_assert_eq!(merged.into_iter().collect::<Vec<_>>(), expected);
        }

        #[cfg_attr(miri, ignore)]
        #[test]
        fn strategies_agree(lists in sorted_lists()) {
            let heap = List::merge_k_with(crate::Strategy::Heap, to_lists(&lists));
            let pairwise = List::merge_k_with(crate::Strategy::Pairwise, to_lists(&lists));
            prop_assert_eq!(heap, pairwise);
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn random_pairs() {
        let mut rng = rand::rng();
        for _ in 0..64 {
            let k = rng.random_range(0..32);
            let lists: Vec<Vec<u64>> = (0..k)
                .map(|_| {
                    let len = rng.random_range(0..256);
                    let mut l: Vec<u64> = (0..len).map(|_| rng.random_range(0..1024)).collect();
                    l.sort_unstable();
                    l
                })
                .collect();
            let mut expected: Vec<u64> = lists.iter().flatten().copied().collect();
            expected.sort_unstable();

            for strategy in [crate::Strategy::Heap, crate::Strategy::Pairwise] {
                let merged = List::merge_k_with(
                    strategy,
                    lists.iter().map(|l| l.iter().copied().collect::<List<u64>>()),
                );
                assert!(merged.iter().eq(expected.iter()), "{strategy}");
            }
        }
    }
}

mod shared_map_test {
    use crate::{key_for, run_writers, verify, SharedMap, WriterConfig};
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    proptest! {
        #[cfg_attr(miri, ignore)]
        #[test]
        fn distinct_keys(writers in 0_usize..6, keys_per_writer in 0_usize..512) {
            let map = SharedMap::default();
            let config = WriterConfig { writers, keys_per_writer };
            let report = run_writers(&map, &config).unwrap();
            prop_assert_eq!(report.distinct_keys, config.distinct_keys());
            prop_assert_eq!(map.len(), config.distinct_keys());
            prop_assert!(verify(&map, &config));
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn reads_during_writes() {
        let map = Arc::new(SharedMap::default());
        let config = WriterConfig {
            writers: 4,
            keys_per_writer: 2048,
        };
        let reader = {
            let map = map.clone();
            thread::spawn(move || {
                let mut observed = 0;
                while observed < config.keys_per_writer {
                    observed = map.len();
                    for i in 0..observed.min(16) {
                        assert!(map.read(&key_for(i), |_, _| ()).is_some());
                    }
                    thread::yield_now();
                }
            })
        };
        run_writers(&map, &config).unwrap();
        assert!(reader.join().is_ok());
        assert!(verify(&map, &config));
    }

    #[cfg(feature = "async")]
    #[cfg_attr(miri, ignore)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn async_runs_share_map() {
        use crate::run_writers_async;

        let map = Arc::new(SharedMap::default());
        let config = WriterConfig {
            writers: 4,
            keys_per_writer: 512,
        };
        let runs = (0..4).map(|_| {
            let map = map.clone();
            async move { run_writers_async(map, &config).await }
        });
        for result in futures::future::join_all(runs).await {
            assert!(result.unwrap().distinct_keys <= 512);
        }
        assert_eq!(map.len(), 512);
        assert!(verify(&map, &config));
    }
}

mod schedule_test {
    use crate::{split_by_grade, thin_first, PieceStep, Sequencing};
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn schedules() -> impl Strategy<Value = Vec<PieceStep>> {
        vec((0_u8..3, 1_u32..200, 0_u8..2), 0..24).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (grade, tenths, width))| {
                    let grade = ["A", "B", "C"][usize::from(grade)];
                    let width = if width == 0 { 1500.0 } else { 1800.0 };
                    let thickness = f64::from(tenths) / 10.0;
                    let mut piece = PieceStep::new(&format!("P{i}"), i, width, thickness, grade);
                    piece.preferred_next = piece.thickness - 1.0..=piece.thickness + 1.0;
                    piece.tolerated_next = piece.thickness - 3.0..=piece.thickness + 3.0;
                    piece
                })
                .collect()
        })
    }

    fn grades(pieces: &[PieceStep]) -> Vec<String> {
        pieces.iter().map(|p| p.inner_steel_grade.clone()).collect()
    }

    fn sorted_ids(pieces: &[PieceStep]) -> Vec<usize> {
        let mut ids: Vec<usize> = pieces.iter().map(|p| p.sequence).collect();
        ids.sort_unstable();
        ids
    }

    proptest! {
        #[cfg_attr(miri, ignore)]
        #[test]
        fn thin_first_sorts_each_grade(schedule in schedules()) {
            let groups = thin_first(split_by_grade(schedule.clone()));
            let flat: Vec<PieceStep> = groups.into_iter().flatten().collect();
            prop_assert_eq!(grades(&flat), grades(&schedule));
            prop_assert_eq!(sorted_ids(&flat), sorted_ids(&schedule));
            for grade in ["A", "B", "C"] {
                let thicknesses: Vec<f64> = flat
                    .iter()
                    .filter(|p| p.inner_steel_grade == grade)
                    .map(|p| p.thickness)
                    .collect();
                prop_assert!(thicknesses.windows(2).all(|w| w[0] <= w[1]));
            }
        }

        #[cfg_attr(miri, ignore)]
        #[test]
        fn plans_are_permutations(schedule in schedules()) {
            for sequencing in [Sequencing::Orientation, Sequencing::Endpoints] {
                let planned = sequencing.plan(schedule.clone());
                prop_assert_eq!(grades(&planned), grades(&schedule));
                prop_assert_eq!(sorted_ids(&planned), sorted_ids(&schedule));
            }
        }
    }
}
