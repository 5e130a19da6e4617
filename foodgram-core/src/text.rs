/// Display form of an ingredient name: first character upper-cased, the rest lower-cased.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("flour"), "Flour");
        assert_eq!(capitalize("BROWN SUGAR"), "Brown sugar");
        assert_eq!(capitalize("яйца"), "Яйца");
        assert_eq!(capitalize(""), "");
    }
}
