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

// Unit lowering: drives statement lowering over each reachable function
// body in one depth-first, strictly sequential pass. All mutable lowering
// state (label counter, per-function frame) is threaded through `LowerCtx`
// rather than living in ambient globals.

mod expr;
mod stmt;

use std::io::Write;

use crate::ast::{Program, Span};
use crate::emit::Emitter;
use crate::error::{CodegenError, ErrorKind};
use crate::frame::{FrameCtx, RECEIVER_SLOT};
use crate::insn::Insn;
use crate::labels::LabelGen;
use crate::typectx::{ExprTypes, FnSignature, SymbolTable, TypeRepr};
use crate::value;

pub(crate) use expr::lower_expr;
pub(crate) use stmt::lower_stmt;

/// The unit's class-like name in the target format.
pub const UNIT_NAME: &str = "Main";

// The assembler wants conservative per-method operand/local limits up
// front; both are fixed at 128 for every emitted method.
const STACK_LIMIT: u32 = 128;
const LOCALS_LIMIT: u32 = 128;

pub(crate) struct LowerCtx<'a, W: Write> {
    pub symtab: &'a SymbolTable,
    pub types: &'a ExprTypes,
    pub labels: LabelGen,
    pub frame: FrameCtx,
    /// Declared return type of the function currently being lowered.
    pub ret_ty: TypeRepr,
    pub out: Emitter<W>,
}

/// Lower a whole checked program into the target assembly stream:
/// unit header, fixed static entry point, one method per reachable
/// function (in the symbol table's reachable order), then the top-level
/// initializer as the unit constructor.
pub fn lower_unit<W: Write>(
    p: &Program,
    types: &ExprTypes,
    symtab: &SymbolTable,
    out: W,
) -> Result<(), CodegenError> {
    let mut ctx = LowerCtx {
        symtab,
        types,
        labels: LabelGen::new(),
        frame: FrameCtx::entry(),
        ret_ty: TypeRepr::Void,
        out: Emitter::new(out),
    };

    ctx.out.directive(&format!(".class public {}", UNIT_NAME))?;
    ctx.out.directive(".super java/lang/Object")?;

    lower_entry_method(&mut ctx)?;

    for name in symtab.reachable() {
        let sig = ctx.symtab.signature_of(name, Span::point(0))?;
        let decl = p.func(name).ok_or_else(|| {
            CodegenError::at(
                ErrorKind::Signature,
                0,
                format!("reachable function '{}' has no declaration", name),
            )
        })?;
        lower_function(decl, sig, &mut ctx)?;
    }

    lower_init_method(p, &mut ctx)
}

/// Fixed entry point: construct one unit instance and run its initializer.
fn lower_entry_method<W: Write>(ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    ctx.out
        .directive(".method public static main([Ljava/lang/String;)V")?;
    emit_limits(ctx)?;
    ctx.out.insn(&Insn::New(UNIT_NAME))?;
    ctx.out.insn(&Insn::InvokeSpecial("Main/<init>()V"))?;
    ctx.out.insn(&Insn::Return)?;
    ctx.out.directive(".end method")
}

fn lower_function<W: Write>(
    decl: &crate::ast::FuncDecl,
    sig: &FnSignature,
    ctx: &mut LowerCtx<'_, W>,
) -> Result<(), CodegenError> {
    let mut header = format!(".method public {}(", decl.name);
    for (_, ty) in &sig.params {
        header.push_str(value::descriptor(ty));
    }
    header.push(')');
    header.push_str(value::descriptor(&sig.ret));
    ctx.out.directive(&header)?;
    emit_limits(ctx)?;

    // Fresh frame: the temp counter is write-once per function lowering.
    ctx.frame = FrameCtx::for_fn(&decl.params);
    ctx.ret_ty = sig.ret.clone();
    lower_stmt(&decl.body, ctx)?;

    ctx.out.directive(".end method")
}

/// The top-level initializer body becomes the unit constructor,
/// terminating with a plain return.
fn lower_init_method<W: Write>(p: &Program, ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    ctx.out.directive(".method public <init>()V")?;
    emit_limits(ctx)?;
    ctx.out.insn(&Insn::ALoad(RECEIVER_SLOT))?;
    ctx.out
        .insn(&Insn::InvokeSpecial("java/lang/Object/<init>()V"))?;

    ctx.frame = FrameCtx::entry();
    ctx.ret_ty = TypeRepr::Void;
    lower_stmt(&p.main.body, ctx)?;

    ctx.out.insn(&Insn::Return)?;
    ctx.out.directive(".end method")
}

fn emit_limits<W: Write>(ctx: &mut LowerCtx<'_, W>) -> Result<(), CodegenError> {
    ctx.out.directive(&format!(".limit stack {}", STACK_LIMIT))?;
    ctx.out.directive(&format!(".limit locals {}", LOCALS_LIMIT))
}
