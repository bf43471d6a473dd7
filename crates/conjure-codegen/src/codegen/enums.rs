use super::{CodeGenerator, Declaration, EnumVariantDecl, GeneratedType};
use crate::codec::TypeCodec;
use crate::graph::{EnumMember, NamedType};

impl<'g> CodeGenerator<'g> {
    /// Declared values plus a catch-all holding any other string
    pub(super) fn generate_enum(&self, named: &NamedType, values: &[EnumMember]) -> GeneratedType {
        let idents = self.variant_idents(values.iter().map(|v| v.value.as_str()));
        let unknown = self.unknown_ident(&idents);

        let variants = values
            .iter()
            .zip(idents)
            .map(|(member, ident)| EnumVariantDecl {
                value: member.value.clone(),
                ident,
                constant: self.constant_ident(&member.value),
                docs: member.docs.clone(),
            })
            .collect();

        GeneratedType {
            name: named.name.clone(),
            docs: named.docs.clone(),
            declaration: Declaration::Enum {
                ident: self.type_ident(&named.name),
                variants,
                unknown,
            },
            codec: TypeCodec::Enum {
                values: values.iter().map(|v| v.value.clone()).collect(),
            },
        }
    }
}
