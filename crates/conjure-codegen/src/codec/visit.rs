use super::{Codecs, TypeCodec};
use crate::error::VisitError;
use crate::graph::TypeName;
use conjure_common::Value;
use conjure_common::types::UnionValue;

/// Exhaustive handler for the variants of a union.
///
/// A decoded union may hold a discriminant its schema does not declare.
/// Such values only reach [`UnionVisitor::visit_unknown`], which fails unless
/// overridden.
pub trait UnionVisitor {
    type Output;

    /// Called for a declared variant
    fn visit(&mut self, variant: &str, payload: Option<&Value>)
    -> Result<Self::Output, VisitError>;

    /// Called for an undeclared discriminant; `payload` is raw JSON if present
    fn visit_unknown(
        &mut self,
        discriminant: &str,
        payload: Option<&Value>,
    ) -> Result<Self::Output, VisitError> {
        let _ = payload;
        Err(VisitError::UnknownVariant {
            discriminant: discriminant.to_owned(),
        })
    }
}

/// Dispatch a union value of type `name` to `visitor`
pub fn visit_union<V: UnionVisitor + ?Sized>(
    codecs: &Codecs,
    name: &TypeName,
    value: &UnionValue,
    visitor: &mut V,
) -> Result<V::Output, VisitError> {
    let Some(TypeCodec::Union { variants, .. }) = codecs.get(name) else {
        return Err(VisitError::NotAUnion {
            type_name: name.clone(),
        });
    };

    let discriminant = value.discriminant();
    if variants.iter().any(|v| v.wire_name.as_str() == discriminant) {
        visitor.visit(discriminant, value.payload())
    } else {
        visitor.visit_unknown(discriminant, value.payload())
    }
}
