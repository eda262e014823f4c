// tests/property_sink.rs

use noderun::sink::LogSink;
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    /// Whatever a run produced, the on-disk file after close holds exactly
    /// the last `min(n, capacity)` lines, in order.
    #[test]
    fn file_holds_the_last_capacity_lines(
        lines in proptest::collection::vec("[a-z0-9 ]{0,12}", 0..120),
        capacity in 1usize..20,
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");

        let mut sink = LogSink::with_capacity(&path, capacity);
        for line in &lines {
            sink.append(line);
        }
        sink.close();

        let content = std::fs::read_to_string(&path).unwrap();
        let on_disk: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(capacity);
        let expected: Vec<&str> = lines[start..].iter().map(String::as_str).collect();
        prop_assert_eq!(on_disk, expected);
    }
}
