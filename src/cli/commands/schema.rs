use crate::cli::commands::print_json;
use crate::error::Result;
use crate::model::Defect;
use schemars::schema::RootSchema;
use schemars::schema_for;

/// JSON Schema of the stored collection (an array of defects).
#[must_use]
pub fn collection_schema() -> RootSchema {
    schema_for!(Vec<Defect>)
}

/// Execute the schema command.
///
/// # Errors
///
/// Returns an error if the schema cannot be serialized.
pub fn execute() -> Result<()> {
    print_json(&collection_schema())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_camel_case_record() {
        let json = serde_json::to_value(collection_schema()).unwrap();
        assert_eq!(json["type"], "array");

        let defect = &json["definitions"]["Defect"];
        let required: Vec<&str> = defect["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"createdAt"));
        assert!(required.contains(&"title"));
        assert!(!required.contains(&"assignee"));
        assert!(defect["properties"].get("updatedAt").is_some());
    }
}
