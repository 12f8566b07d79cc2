/// Turn a construct name into a valid CloudFormation logical ID
///
/// Known separators are replaced with their uppercase-alpha counterparts,
/// anything else that is not alphanumeric is dropped.
pub fn escape_resource_name(name: &str) -> String {
    name.replace("@", "AT")
        .replace(".", "DOT")
        .replace("-", "HYPHEN")
        .replace("_", "UNDRSC")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_separators() {
        assert_eq!(
            escape_resource_name("my-app_v1.0@x"),
            "myHYPHENappUNDRSCv1DOT0ATx"
        );
    }

    #[test]
    fn drops_other_characters() {
        assert_eq!(escape_resource_name("a/b c+d"), "abcd");
    }
}
