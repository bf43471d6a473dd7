use super::{Type, TypeGraph, TypeId, TypeName};
use crate::error::SchemaError;
use std::collections::HashMap;

impl TypeGraph {
    /// Replace every placeholder reference with a resolved [`TypeId`], then
    /// validate alias chains, union variant names and map keys.
    ///
    /// Any failure aborts the whole run; the graph must not be synthesized
    /// from unless this returns `Ok`.
    pub fn resolve_all(&mut self) -> Result<(), SchemaError> {
        tracing::debug!(types = self.types.len(), "resolving type graph");

        let mut pending: Vec<TypeId> = (0..self.types.len()).rev().map(TypeId).collect();
        while let Some(id) = pending.pop() {
            self.resolve_named(id, &mut pending)?;
        }
        self.check_alias_cycles()?;
        self.check_union_variants()?;
        self.check_map_keys()?;

        self.resolved = true;
        tracing::info!(types = self.types.len(), "type graph resolved");
        Ok(())
    }

    /// Resolve one named type's members and queue the types they reach.
    ///
    /// The type is marked before its members are walked, so reaching it again
    /// through a cycle is a no-op.
    fn resolve_named(&mut self, id: TypeId, pending: &mut Vec<TypeId>) -> Result<(), SchemaError> {
        if self.types[id.0].resolved {
            return Ok(());
        }
        self.types[id.0].resolved = true;

        let mut reachable = Vec::new();
        {
            let index = &self.index;
            let owner = &mut self.types[id.0];
            let from = owner.name.clone();
            for member in owner.kind.members_mut() {
                resolve_type(member, index, &from, &mut reachable)?;
            }
        }

        // Reversed so members are walked in declaration order
        pending.extend(
            reachable
                .into_iter()
                .rev()
                .filter(|next| !self.types[next.0].resolved),
        );
        Ok(())
    }
}

/// Resolve placeholders inside one structural type expression, in place
fn resolve_type(
    ty: &mut Type,
    index: &HashMap<TypeName, TypeId>,
    from: &TypeName,
    reachable: &mut Vec<TypeId>,
) -> Result<(), SchemaError> {
    match ty {
        Type::Primitive(_) => Ok(()),
        Type::Named(id) => {
            reachable.push(*id);
            Ok(())
        }
        Type::Optional(item) | Type::List(item) | Type::Set(item) => {
            resolve_type(item, index, from, reachable)
        }
        Type::Map { key, value } => {
            resolve_type(key, index, from, reachable)?;
            resolve_type(value, index, from, reachable)
        }
        Type::External { fallback, .. } => resolve_type(fallback, index, from, reachable),
        Type::Unresolved(name) => {
            let Some(&id) = index.get(&*name) else {
                tracing::warn!(%name, referenced_from = %from, "unresolved reference");
                return Err(SchemaError::UnresolvedReference {
                    name: name.clone(),
                    referenced_from: from.clone(),
                });
            };
            tracing::trace!(%name, referenced_from = %from, "resolved reference");
            *ty = Type::Named(id);
            reachable.push(id);
            Ok(())
        }
    }
}
