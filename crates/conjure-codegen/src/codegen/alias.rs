use super::{CodeGenerator, Declaration, GeneratedType};
use crate::codec::{AliasStrategy, TypeCodec};
use crate::error::Result;
use crate::graph::{NamedType, Type};

impl<'g> CodeGenerator<'g> {
    /// Alias of `optional<T>` becomes a nullable wrapper over `T`; any other
    /// alias is a transparent newtype
    pub(super) fn generate_alias(&self, named: &NamedType, item: &Type) -> Result<GeneratedType> {
        let ident = self.type_ident(&named.name);
        let strategy = self.alias_strategy(item);

        let (declaration, codec) = match (strategy, item) {
            (AliasStrategy::Nullable, Type::Optional(inner)) => (
                Declaration::NullableWrapper {
                    ident,
                    item: self.type_ref(inner, &named.name)?,
                },
                TypeCodec::Alias {
                    strategy,
                    item: self.value_codec(inner, &named.name)?,
                },
            ),
            _ => (
                Declaration::Newtype {
                    ident,
                    item: self.type_ref(item, &named.name)?,
                },
                TypeCodec::Alias {
                    strategy,
                    item: self.value_codec(item, &named.name)?,
                },
            ),
        };

        Ok(GeneratedType {
            name: named.name.clone(),
            docs: named.docs.clone(),
            declaration,
            codec,
        })
    }
}
