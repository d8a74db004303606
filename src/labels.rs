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

use crate::insn::Label;

/// Branch-target allocator. One counter per unit lowering, shared by every
/// function and statement, so syntactically identical constructs (nested or
/// repeated) can never produce colliding target names.
#[derive(Debug, Default)]
pub struct LabelGen {
    next: u32,
}

impl LabelGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// `role` tags the label with its construct ("else", "endif",
    /// "whilestart", ...); the counter makes it unique.
    pub fn fresh(&mut self, role: &str) -> Label {
        let l = Label(format!("Label_{}{}", role, self.next));
        self.next += 1;
        l
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_role_twice_gives_distinct_labels() {
        let mut gen = LabelGen::new();
        let a = gen.fresh("else");
        let b = gen.fresh("else");
        assert_ne!(a, b);
        assert_eq!(a.0, "Label_else0");
        assert_eq!(b.0, "Label_else1");
    }

    #[test]
    fn counter_is_shared_across_roles() {
        let mut gen = LabelGen::new();
        assert_eq!(gen.fresh("false").0, "Label_false0");
        assert_eq!(gen.fresh("endif").0, "Label_endif1");
        assert_eq!(gen.fresh("false").0, "Label_false2");
    }
}
