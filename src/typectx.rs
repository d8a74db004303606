/**
 * Copyright 2022 - Jahred Love
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1. Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2. Redistributions in binary form must reproduce the above copyright notice, this
 * list of conditions and the following disclaimer in the documentation and/or other
 * materials provided with the distribution.
 *
 * 3. Neither the name of the copyright holder nor the names of its contributors may
 * be used to endorse or promote products derived from this software without specific
 * prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS “AS IS” AND
 * ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED
 * WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED.
 * IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT,
 * INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT
 * NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
 * PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
 * WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
 * ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
 * POSSIBILITY OF SUCH DAMAGE.
 */

// Static-type surface the backend consumes. The checker (external) records
// one `TypeRepr` per expression node and one `FnSignature` per declared
// function; the backend only reads them.

use std::collections::HashMap;

use crate::ast::{Expr, NodeId, Span};
use crate::error::{CodegenError, ErrorKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRepr {
    Int,
    Bool,
    Str,
    List(Box<TypeRepr>),
    /// First-class function value, carrying the declared function's name.
    Fptr(String),
    Void,
}

impl TypeRepr {
    pub fn list_of_int() -> Self {
        TypeRepr::List(Box::new(TypeRepr::Int))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRepr::Void)
    }
}

/// Ordered parameter list plus return type of one declared function.
#[derive(Clone, Debug)]
pub struct FnSignature {
    pub params: Vec<(String, TypeRepr)>,
    pub ret: TypeRepr,
}

impl FnSignature {
    pub fn new(params: Vec<(&str, TypeRepr)>, ret: TypeRepr) -> Self {
        Self {
            params: params.into_iter().map(|(n, t)| (n.to_string(), t)).collect(),
            ret,
        }
    }
}

/// Per-unit function signatures and the ordered reachable set (computed by
/// an external reachability pass; the backend emits exactly these, in order).
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    funcs: HashMap<String, FnSignature>,
    reachable: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, sig: FnSignature) {
        let name = name.into();
        if !self.reachable.contains(&name) {
            self.reachable.push(name.clone());
        }
        self.funcs.insert(name, sig);
    }

    /// Restrict the emission worklist. Names absent from the table are
    /// caught later, at emission, as signature errors.
    pub fn set_reachable(&mut self, names: Vec<String>) {
        self.reachable = names;
    }

    pub fn reachable(&self) -> &[String] {
        &self.reachable
    }

    /// Probe for a declared function. `None` simply means "not a function
    /// name" — identifier lowering branches on this tag rather than
    /// catching a lookup failure.
    pub fn lookup(&self, name: &str) -> Option<&FnSignature> {
        self.funcs.get(name)
    }

    /// Like `lookup`, but a miss is the fatal missing-signature condition.
    pub fn signature_of(&self, name: &str, span: Span) -> Result<&FnSignature, CodegenError> {
        self.funcs.get(name).ok_or_else(|| {
            CodegenError::new(
                ErrorKind::Signature,
                span,
                format!("no signature for function '{}'", name),
            )
        })
    }
}

/// The type-annotation service: total over every expression node of a
/// checked AST. A missing entry means the checker and backend disagree
/// about the node set, which is fatal.
#[derive(Clone, Debug, Default)]
pub struct ExprTypes {
    map: HashMap<NodeId, TypeRepr>,
}

impl ExprTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: NodeId, ty: TypeRepr) {
        self.map.insert(id, ty);
    }

    pub fn type_of(&self, e: &Expr) -> Result<&TypeRepr, CodegenError> {
        self.map.get(&e.id).ok_or_else(|| {
            CodegenError::new(
                ErrorKind::Type,
                e.span,
                "expression has no recorded static type",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, ExprKind};

    #[test]
    fn lookup_miss_is_none_but_signature_of_is_fatal() {
        let symtab = SymbolTable::new();
        assert!(symtab.lookup("f").is_none());
        let err = symtab.signature_of("f", Span::point(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Signature);
    }

    #[test]
    fn reachable_preserves_definition_order() {
        let mut symtab = SymbolTable::new();
        symtab.define("b", FnSignature::new(vec![], TypeRepr::Void));
        symtab.define("a", FnSignature::new(vec![], TypeRepr::Void));
        assert_eq!(symtab.reachable(), ["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn missing_annotation_is_a_type_error() {
        let types = ExprTypes::new();
        let e = Expr {
            id: NodeId(7),
            node: ExprKind::IntLit(1),
            span: Span::point(0),
        };
        let err = types.type_of(&e).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }
}
