use convert_case::{Case, Casing};

/// Model name for a table: upper camel case (`user_profile` -> `UserProfile`).
pub fn derive_model_name(table_name: &str) -> String {
    table_name.to_case(Case::Pascal)
}
