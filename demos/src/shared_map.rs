#[cfg(test)]
mod examples {
    use kway::{key_for, run_writers, run_writers_async, verify, SharedMap, WriterConfig};
    use std::sync::Arc;

    #[test]
    fn two_writers() {
        let map = SharedMap::default();
        let config = WriterConfig::default();
        let report = run_writers(&map, &config).unwrap();
        assert_eq!(report.distinct_keys, 1000);
        assert!(verify(&map, &config));
        assert!(map.read(&key_for(999), |_, v| *v == 999 || *v == 9990).unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn two_async_writers() {
        let map = Arc::new(SharedMap::default());
        let config = WriterConfig::default();
        let report = run_writers_async(map.clone(), &config).await.unwrap();
        assert_eq!(report.distinct_keys, 1000);
        assert!(verify(&map, &config));
    }
}
