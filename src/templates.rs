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

// Pre-built runtime support definitions, copied verbatim into the artifact
// directory next to the generated unit. Generated code links against both
// at assembly time; neither is produced by lowering.

/// Dynamic list: an ArrayList-backed reference type with the append /
/// indexed-get / size surface the generated code invokes.
pub const LIST_SUPPORT: &str = r#".class public List
.super java/lang/Object

.field private elements Ljava/util/ArrayList;

.method public <init>(Ljava/util/ArrayList;)V
    .limit stack 2
    .limit locals 2
    aload_0
    invokespecial java/lang/Object/<init>()V
    aload_0
    aload_1
    putfield List/elements Ljava/util/ArrayList;
    return
.end method

.method public addElement(Ljava/lang/Object;)V
    .limit stack 2
    .limit locals 2
    aload_0
    getfield List/elements Ljava/util/ArrayList;
    aload_1
    invokevirtual java/util/ArrayList/add(Ljava/lang/Object;)Z
    pop
    return
.end method

.method public getElement(I)Ljava/lang/Object;
    .limit stack 2
    .limit locals 2
    aload_0
    getfield List/elements Ljava/util/ArrayList;
    iload_1
    invokevirtual java/util/ArrayList/get(I)Ljava/lang/Object;
    areturn
.end method

.method public getSize()I
    .limit stack 1
    .limit locals 1
    aload_0
    getfield List/elements Ljava/util/ArrayList;
    invokevirtual java/util/ArrayList/size()I
    ireturn
.end method
"#;

/// Function pointer: a captured receiver instance paired with a method
/// name. `invoke` marshals the argument list and dispatches by name
/// against the receiver reflectively.
pub const FPTR_SUPPORT: &str = r#".class public Fptr
.super java/lang/Object

.field private instance Ljava/lang/Object;
.field private name Ljava/lang/String;

.method public <init>(Ljava/lang/Object;Ljava/lang/String;)V
    .limit stack 2
    .limit locals 3
    aload_0
    invokespecial java/lang/Object/<init>()V
    aload_0
    aload_1
    putfield Fptr/instance Ljava/lang/Object;
    aload_0
    aload_2
    putfield Fptr/name Ljava/lang/String;
    return
.end method

.method public invoke(Ljava/util/ArrayList;)Ljava/lang/Object;
    .limit stack 6
    .limit locals 6
    aload_0
    getfield Fptr/instance Ljava/lang/Object;
    invokevirtual java/lang/Object/getClass()Ljava/lang/Class;
    invokevirtual java/lang/Class/getMethods()[Ljava/lang/reflect/Method;
    astore_2
    iconst_0
    istore_3
Scan:
    iload_3
    aload_2
    arraylength
    if_icmpge NoSuchMethod
    aload_2
    iload_3
    aaload
    astore 4
    aload 4
    invokevirtual java/lang/reflect/Method/getName()Ljava/lang/String;
    aload_0
    getfield Fptr/name Ljava/lang/String;
    invokevirtual java/lang/String/equals(Ljava/lang/Object;)Z
    ifeq NextMethod
    aload 4
    aload_0
    getfield Fptr/instance Ljava/lang/Object;
    aload_1
    invokevirtual java/util/ArrayList/toArray()[Ljava/lang/Object;
    invokevirtual java/lang/reflect/Method/invoke(Ljava/lang/Object;[Ljava/lang/Object;)Ljava/lang/Object;
    areturn
NextMethod:
    iinc 3 1
    goto Scan
NoSuchMethod:
    aconst_null
    areturn
.end method
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_support_exposes_the_invoked_surface() {
        for sig in [
            "<init>(Ljava/util/ArrayList;)V",
            "addElement(Ljava/lang/Object;)V",
            "getElement(I)Ljava/lang/Object;",
            "getSize()I",
        ] {
            assert!(LIST_SUPPORT.contains(sig), "missing {sig}");
        }
    }

    #[test]
    fn fptr_support_exposes_the_invoked_surface() {
        assert!(FPTR_SUPPORT.contains("<init>(Ljava/lang/Object;Ljava/lang/String;)V"));
        assert!(FPTR_SUPPORT.contains("invoke(Ljava/util/ArrayList;)Ljava/lang/Object;"));
    }
}
