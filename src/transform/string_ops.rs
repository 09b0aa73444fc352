use std::borrow::Cow;

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use regex::Regex;

use crate::cli::CaseStyle;

/// Returns a lowercase representation, reusing the original string if already lowercase.
pub fn lowercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_uppercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_lowercase())
    }
}

/// Drops leading whitespace, borrowing the original.
pub fn trim_leading(input: &str) -> Cow<'_, str> {
    Cow::Borrowed(input.trim_start())
}

fn converted<'a>(input: &'a str, converted: String) -> Cow<'a, str> {
    if converted == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(converted)
    }
}

/// Converts identifiers to `snake_case`.
pub fn snake_case(input: &str) -> Cow<'_, str> {
    converted(input, input.to_snake_case())
}

/// Converts identifiers to `camelCase`.
pub fn camel_case(input: &str) -> Cow<'_, str> {
    converted(input, input.to_lower_camel_case())
}

/// Converts identifiers to `PascalCase`.
pub fn pascal_case(input: &str) -> Cow<'_, str> {
    converted(input, input.to_upper_camel_case())
}

pub fn to_case(input: &str, style: CaseStyle) -> Cow<'_, str> {
    match style {
        CaseStyle::Snake => snake_case(input),
        CaseStyle::Camel => camel_case(input),
        CaseStyle::Pascal => pascal_case(input),
    }
}

/// Applies a regex replacement while avoiding allocation when there are no matches.
pub fn regex_replace<'a>(value: &'a str, regex: &Regex, replacement: &str) -> Cow<'a, str> {
    if regex.is_match(value) {
        Cow::Owned(regex.replace_all(value, replacement).into_owned())
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversions() {
        assert_eq!(snake_case("Order Date"), "order_date");
        assert_eq!(camel_case("order_date"), "orderDate");
        assert_eq!(pascal_case("order date"), "OrderDate");
        assert_eq!(to_case("Unit-Price", CaseStyle::Snake), "unit_price");
    }

    #[test]
    fn unchanged_input_is_borrowed() {
        assert!(matches!(snake_case("already_snake"), Cow::Borrowed(_)));
        assert!(matches!(lowercase("quiet"), Cow::Borrowed(_)));
        assert!(matches!(lowercase("LOUD"), Cow::Owned(ref s) if s == "loud"));
    }

    #[test]
    fn trim_leading_keeps_trailing_space() {
        assert_eq!(trim_leading("   padded  "), "padded  ");
    }

    #[test]
    fn regex_replace_supports_captures() {
        let regex = Regex::new(r"^col_(\d+)$").unwrap();
        assert_eq!(regex_replace("col_7", &regex, "field$1"), "field7");
        assert!(matches!(regex_replace("name", &regex, "x"), Cow::Borrowed("name")));
    }
}
