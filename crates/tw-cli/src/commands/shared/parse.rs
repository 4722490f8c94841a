use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use tw_core::enums::{Priority, TaskStatus};

    use super::parse_enum;

    #[test]
    fn parses_snake_case_enum() {
        let status: TaskStatus = parse_enum("complete", "status").expect("status should parse");
        assert_eq!(status, TaskStatus::Complete);
    }

    #[test]
    fn parses_hyphenated_and_upper_case_spellings() {
        let status: TaskStatus = parse_enum("In-Progress", "status").expect("status should parse");
        assert_eq!(status, TaskStatus::InProgress);
        let priority: Priority = parse_enum("HIGH", "priority").expect("priority should parse");
        assert_eq!(priority, Priority::High);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<TaskStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }
}
