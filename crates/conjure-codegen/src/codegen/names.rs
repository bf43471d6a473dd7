use super::CodeGenerator;
use super::utils::{dedupe_idents, make_ident, sanitize_name, value_to_variant_name};
use crate::graph::TypeName;
use heck::{ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

impl<'g> CodeGenerator<'g> {
    /// PascalCase identifier of a named type
    pub(super) fn type_ident(&self, name: &TypeName) -> String {
        sanitize_name(&name.name.to_pascal_case())
    }

    /// snake_case identifiers for a list of wire names, unique within the list
    pub(super) fn field_idents<'a>(&self, wire_names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        dedupe_idents(
            wire_names
                .into_iter()
                .map(|n| make_ident(&n.to_snake_case()))
                .collect(),
        )
    }

    /// PascalCase variant identifiers, unique within the list
    pub(super) fn variant_idents<'a>(
        &self,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        dedupe_idents(values.into_iter().map(value_to_variant_name).collect())
    }

    /// SHOUTY_SNAKE constant identifier for an enum value
    pub(super) fn constant_ident(&self, value: &str) -> String {
        sanitize_name(&value.to_shouty_snake_case())
    }

    /// Identifier of the catch-all variant, avoiding declared variant names
    pub(super) fn unknown_ident(&self, taken: &[String]) -> String {
        let mut ident = "Unknown".to_string();
        while taken.contains(&ident) {
            ident.push_str("Variant");
        }
        ident
    }

    /// `Namespace:Name` identity carried by serialized errors
    pub(super) fn error_identity(&self, namespace: &str, name: &TypeName) -> String {
        format!("{}:{}", namespace, name.name)
    }
}
