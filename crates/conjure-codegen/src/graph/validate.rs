use super::{NamedKind, Type, TypeGraph, TypeId, TypeName};
use crate::codec::UNION_DISCRIMINANT;
use crate::error::SchemaError;

impl TypeGraph {
    /// Human-readable form of a type expression, e.g. `map<string, com.example.Book>`
    pub fn describe(&self, ty: &Type) -> String {
        match ty {
            Type::Primitive(p) => p.as_str().to_ascii_lowercase(),
            Type::Optional(item) => format!("optional<{}>", self.describe(item)),
            Type::List(item) => format!("list<{}>", self.describe(item)),
            Type::Set(item) => format!("set<{}>", self.describe(item)),
            Type::Map { key, value } => {
                format!("map<{}, {}>", self.describe(key), self.describe(value))
            }
            Type::Named(id) => self.get(*id).name.to_string(),
            Type::External { name, .. } | Type::Unresolved(name) => name.to_string(),
        }
    }

    /// Reject alias chains that loop back without passing through a container
    pub(super) fn check_alias_cycles(&self) -> Result<(), SchemaError> {
        for (start, named) in self.iter() {
            let NamedKind::Alias { item } = &named.kind else {
                continue;
            };

            let mut chain = vec![start];
            let mut current = item;
            while let Some(next) = self.aliased(current) {
                if next == start {
                    let mut cycle: Vec<TypeName> =
                        chain.iter().map(|id| self.get(*id).name.clone()).collect();
                    cycle.push(named.name.clone());
                    return Err(SchemaError::CyclicAlias { cycle });
                }
                // A loop not through `start` is reported when walking from its own members
                if chain.contains(&next) {
                    break;
                }
                chain.push(next);
                let NamedKind::Alias { item } = &self.get(next).kind else {
                    break;
                };
                current = item;
            }
        }
        Ok(())
    }

    /// The alias an alias item points straight at, seeing through `optional`
    fn aliased(&self, ty: &Type) -> Option<TypeId> {
        match ty {
            Type::Optional(item) => self.aliased(item),
            Type::Named(id) if matches!(self.get(*id).kind, NamedKind::Alias { .. }) => Some(*id),
            _ => None,
        }
    }

    /// No union variant may share its wire name with the discriminant key
    pub(super) fn check_union_variants(&self) -> Result<(), SchemaError> {
        for (_, named) in self.iter() {
            let NamedKind::Union { variants } = &named.kind else {
                continue;
            };
            if let Some(variant) = variants.iter().find(|v| v.name.as_str() == UNION_DISCRIMINANT) {
                tracing::warn!(union = %named.name, variant = %variant.name, "reserved variant name");
                return Err(SchemaError::ReservedVariantName {
                    variant: variant.name.to_string(),
                    owner: named.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Every map key must have a string key form
    pub(super) fn check_map_keys(&self) -> Result<(), SchemaError> {
        for (_, named) in self.iter() {
            for member in named.kind.members() {
                self.check_keys_in(member, &named.name)?;
            }
        }
        Ok(())
    }

    fn check_keys_in(&self, ty: &Type, owner: &TypeName) -> Result<(), SchemaError> {
        match ty {
            Type::Optional(item) | Type::List(item) | Type::Set(item) => {
                self.check_keys_in(item, owner)
            }
            Type::Map { key, value } => {
                if !self.is_valid_key(key) {
                    tracing::warn!(%owner, key = %self.describe(key), "invalid map key");
                    return Err(SchemaError::InvalidMapKey {
                        key: self.describe(key),
                        owner: owner.clone(),
                    });
                }
                self.check_keys_in(value, owner)
            }
            Type::External { fallback, .. } => self.check_keys_in(fallback, owner),
            Type::Primitive(_) | Type::Named(_) | Type::Unresolved(_) => Ok(()),
        }
    }

    /// Whether a type may be used as a map key
    pub fn is_valid_key(&self, ty: &Type) -> bool {
        match ty {
            Type::Primitive(p) => p.is_valid_key(),
            Type::Named(id) => match &self.get(*id).kind {
                NamedKind::Enum { .. } => true,
                NamedKind::Alias { item } => self.is_valid_key(item),
                _ => false,
            },
            Type::External { fallback, .. } => self.is_valid_key(fallback),
            Type::Optional(_)
            | Type::List(_)
            | Type::Set(_)
            | Type::Map { .. }
            | Type::Unresolved(_) => false,
        }
    }
}
