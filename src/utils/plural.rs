//! Count formatting for log and summary lines.

/// `count` followed by `noun`, with an `s` appended unless `count == 1`.
///
/// ```ignore
/// plural_count(1, "file")   // "1 file"
/// plural_count(3, "folder") // "3 folders"
/// ```
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "file"), "0 files");
        assert_eq!(plural_count(1, "file"), "1 file");
        assert_eq!(plural_count(12, "folder"), "12 folders");
    }
}
