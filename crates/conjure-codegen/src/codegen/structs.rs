use super::{CodeGenerator, Declaration, FieldDecl, GeneratedType};
use crate::codec::{FieldCodec, TypeCodec};
use crate::error::Result;
use crate::graph::{Field, NamedType, TypeName};
use crate::ir::ErrorCode;
use itertools::Itertools;

impl<'g> CodeGenerator<'g> {
    /// Declarations and codecs for an ordered field list
    pub(super) fn generate_fields(
        &self,
        fields: &[Field],
        owner: &TypeName,
    ) -> Result<(Vec<FieldDecl>, Vec<FieldCodec>)> {
        let idents = self.field_idents(fields.iter().map(|f| f.name.as_str()));

        let mut decls = Vec::with_capacity(fields.len());
        let mut codecs = Vec::with_capacity(fields.len());
        for (field, ident) in fields.iter().zip(idents) {
            let presence = self.presence(&field.ty);
            decls.push(FieldDecl {
                wire_name: field.name.clone(),
                ident,
                ty: self.type_ref(&field.ty, owner)?,
                presence,
                docs: field.docs.clone(),
            });
            codecs.push(FieldCodec {
                wire_name: field.name.clone(),
                codec: self.value_codec(&field.ty, owner)?,
                presence,
            });
        }
        Ok((decls, codecs))
    }

    pub(super) fn generate_record(&self, named: &NamedType, fields: &[Field]) -> Result<GeneratedType> {
        let (decls, codecs) = self.generate_fields(fields, &named.name)?;
        Ok(GeneratedType {
            name: named.name.clone(),
            docs: named.docs.clone(),
            declaration: Declaration::Struct {
                ident: self.type_ident(&named.name),
                fields: decls,
            },
            codec: TypeCodec::Record { fields: codecs },
        })
    }

    /// Errors serialize their arguments as one record, safe arguments first
    pub(super) fn generate_error(
        &self,
        named: &NamedType,
        namespace: &str,
        code: ErrorCode,
        safe_args: &[Field],
        unsafe_args: &[Field],
    ) -> Result<GeneratedType> {
        let all_args = safe_args.iter().chain(unsafe_args).cloned().collect_vec();
        let (mut decls, codecs) = self.generate_fields(&all_args, &named.name)?;
        let unsafe_decls = decls.split_off(safe_args.len());

        Ok(GeneratedType {
            name: named.name.clone(),
            docs: named.docs.clone(),
            declaration: Declaration::Error {
                ident: self.type_ident(&named.name),
                namespace: namespace.into(),
                code,
                identity: self.error_identity(namespace, &named.name),
                safe_args: decls,
                unsafe_args: unsafe_decls,
            },
            codec: TypeCodec::Record { fields: codecs },
        })
    }
}
