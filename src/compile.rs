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

// Generation orchestration: artifact directory preparation and the unit
// entry points. The backend has no CLI surface; callers hand it a checked
// program plus its type and symbol tables.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ast::Program;
use crate::error::{CodegenError, ErrorKind};
use crate::lower;
use crate::templates;
use crate::typectx::{ExprTypes, SymbolTable};

pub const UNIT_FILE: &str = "Main.j";
pub const LIST_FILE: &str = "List.j";
pub const FPTR_FILE: &str = "Fptr.j";

#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Artifact directory; cleared of stale files and recreated.
    pub out_dir: PathBuf,
    /// Assembler tool to copy into the artifact directory, when available.
    pub assembler_jar: Option<PathBuf>,
}

fn io_err(e: io::Error, what: &str) -> CodegenError {
    CodegenError::at(ErrorKind::Io, 0, format!("{}: {}", what, e))
}

/// Lower the unit and assemble the artifact directory: the generated
/// instruction stream plus verbatim runtime support copies (and the
/// assembler itself when a path is supplied). Returns the generated unit's
/// path. Any failure aborts the whole unit; there is no partial output
/// contract beyond whatever was already flushed.
pub fn generate_unit(
    p: &Program,
    types: &ExprTypes,
    symtab: &SymbolTable,
    opts: &CompileOptions,
) -> Result<PathBuf, CodegenError> {
    prepare_out_dir(&opts.out_dir)?;

    fs::write(opts.out_dir.join(LIST_FILE), templates::LIST_SUPPORT)
        .map_err(|e| io_err(e, "failed to write list support"))?;
    fs::write(opts.out_dir.join(FPTR_FILE), templates::FPTR_SUPPORT)
        .map_err(|e| io_err(e, "failed to write fptr support"))?;
    if let Some(jar) = &opts.assembler_jar {
        let dst = opts.out_dir.join(
            jar.file_name()
                .ok_or_else(|| CodegenError::at(ErrorKind::Io, 0, "assembler path has no file name"))?,
        );
        fs::copy(jar, dst).map_err(|e| io_err(e, "failed to copy assembler"))?;
    }

    let unit_path = opts.out_dir.join(UNIT_FILE);
    let file = fs::File::create(&unit_path).map_err(|e| io_err(e, "failed to create unit file"))?;
    lower::lower_unit(p, types, symtab, file)?;
    Ok(unit_path)
}

/// In-memory lowering of the unit's instruction stream, for callers (and
/// tests) that do not want the artifact directory.
pub fn generate_unit_text(
    p: &Program,
    types: &ExprTypes,
    symtab: &SymbolTable,
) -> Result<String, CodegenError> {
    let mut buf = Vec::new();
    lower::lower_unit(p, types, symtab, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| CodegenError::at(ErrorKind::Io, 0, format!("non-utf8 output: {}", e)))
}

/// Clear stale files out of the artifact directory and (re)create it.
fn prepare_out_dir(dir: &Path) -> Result<(), CodegenError> {
    if dir.exists() {
        let entries = fs::read_dir(dir).map_err(|e| io_err(e, "failed to read output dir"))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(e, "failed to read output dir entry"))?;
            if entry.path().is_file() {
                fs::remove_file(entry.path())
                    .map_err(|e| io_err(e, "failed to clear output dir"))?;
            }
        }
    }
    fs::create_dir_all(dir).map_err(|e| io_err(e, "failed to create output dir"))
}
