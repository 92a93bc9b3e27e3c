use itertools::Itertools;
use ordered_float::OrderedFloat;

/// Reduce a raw label cell to a "positive" indicator. Binary label columns
/// carry 0/1 or true/false; anything else counts as negative.
pub fn is_positive(cell: &str) -> bool {
    matches!(cell.trim(), "1" | "true" | "True" | "TRUE")
}

/// Indicator vector for binary-valued label cells.
pub fn to_indicators(cells: &[String]) -> Vec<bool> {
    cells.iter().map(|c| is_positive(c)).collect()
}

/// One-vs-rest indicator vector: true where the cell equals `value`.
pub fn one_vs_rest(cells: &[String], value: &str) -> Vec<bool> {
    cells.iter().map(|c| c == value).collect()
}

/// Sort ascending: numeric order when every value parses as a number,
/// lexicographic otherwise.
pub fn sort_natural(values: &mut [String]) {
    if !values.is_empty() && values.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
        values.sort_by_key(|v| OrderedFloat(v.trim().parse::<f64>().unwrap_or(f64::NAN)));
    } else {
        values.sort();
    }
}

/// Distinct values appearing in either column, in natural ascending order.
pub fn distinct_union(a: &[String], b: &[String]) -> Vec<String> {
    let mut values: Vec<String> = a.iter().chain(b.iter()).cloned().unique().collect();
    sort_natural(&mut values);
    values
}

/// Render a [0,1] fraction the way the dashboard shows it.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positive_spellings() {
        assert!(is_positive("1"));
        assert!(is_positive(" true "));
        assert!(is_positive("True"));
        assert!(!is_positive("0"));
        assert!(!is_positive("false"));
        assert!(!is_positive("CATEGORY_2"));
    }

    #[test]
    fn one_vs_rest_marks_only_matches() {
        let cells = strings(&["a", "b", "a", "c"]);
        assert_eq!(one_vs_rest(&cells, "a"), vec![true, false, true, false]);
    }

    #[test]
    fn natural_sort_numeric() {
        let mut vals = strings(&["10", "2", "1"]);
        sort_natural(&mut vals);
        assert_eq!(vals, strings(&["1", "2", "10"]));
    }

    #[test]
    fn natural_sort_lexicographic() {
        let mut vals = strings(&["B", "A", "10"]);
        sort_natural(&mut vals);
        assert_eq!(vals, strings(&["10", "A", "B"]));
    }

    #[test]
    fn union_is_distinct_and_ordered() {
        let a = strings(&["B", "A"]);
        let b = strings(&["C", "A"]);
        assert_eq!(distinct_union(&a, &b), strings(&["A", "B", "C"]));
    }

    #[test]
    fn percent_format() {
        assert_eq!(format_percent(0.5), "50.0%");
        assert_eq!(format_percent(0.123), "12.3%");
    }
}
