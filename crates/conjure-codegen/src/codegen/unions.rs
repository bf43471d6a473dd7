use super::{CodeGenerator, Declaration, GeneratedType};
use crate::codec::{TypeCodec, UNION_DISCRIMINANT};
use crate::error::Result;
use crate::graph::{Field, NamedType};

impl<'g> CodeGenerator<'g> {
    /// One populated variant out of the declared set, tagged by `type`.
    ///
    /// Variant payloads reuse the field machinery; a union that refers to
    /// itself delegates to its own entry point.
    pub(super) fn generate_union(&self, named: &NamedType, variants: &[Field]) -> Result<GeneratedType> {
        let (mut decls, codecs) = self.generate_fields(variants, &named.name)?;

        let idents = self.variant_idents(variants.iter().map(|v| v.name.as_str()));
        for (decl, ident) in decls.iter_mut().zip(&idents) {
            decl.ident = ident.clone();
        }
        let unknown = self.unknown_ident(&idents);

        Ok(GeneratedType {
            name: named.name.clone(),
            docs: named.docs.clone(),
            declaration: Declaration::Union {
                ident: self.type_ident(&named.name),
                variants: decls,
                unknown,
            },
            codec: TypeCodec::Union {
                discriminant: UNION_DISCRIMINANT.into(),
                variants: codecs,
            },
        })
    }
}
