/// Builds a [`Record`](crate::Record) from a list of values.
///
/// Each value is converted with [`ToString`], so numbers and other
/// displayable values can be mixed with strings.
///
/// ```rust
/// use quoted_csv::record;
///
/// let record = record!["A0001", "Train", 12, "No"];
/// assert_eq!(record.values(), &["A0001", "Train", "12", "No"]);
///
/// let empty = record![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! record {
    // Handle empty record
    () => {
        $crate::Record::new()
    };

    ($($value:expr),+ $(,)?) => {
        $crate::Record::from(::std::vec![$(::std::string::ToString::to_string(&$value)),+])
    };
}
