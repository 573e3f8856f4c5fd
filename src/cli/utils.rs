//! Argument helpers shared by the subcommands.

/// Split a comma-separated flag value into trimmed, non-empty items.
///
/// A missing flag and a flag with no items both yield `None`, so the
/// configured list is left in place.
pub fn csv_list(value: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_items() {
        assert_eq!(
            csv_list(Some(" gen/**, *.pb.go ,,docs/**")),
            Some(vec!["gen/**".to_string(), "*.pb.go".to_string(), "docs/**".to_string()])
        );
    }

    #[test]
    fn blank_values_leave_config_untouched() {
        assert_eq!(csv_list(None), None);
        assert_eq!(csv_list(Some(" , ")), None);
    }
}
