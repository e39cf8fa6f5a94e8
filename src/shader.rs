use anyhow::{anyhow, Context, Result};
use shaderc::ShaderKind;
use std::fs;
use std::path::{Path, PathBuf};
use vulkanalia::prelude::v1_0::*;

use crate::error::ShaderError;

pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// A shader stage with its built-in GLSL source.
#[derive(Clone, Copy, Debug)]
pub struct ShaderSource {
    pub name: &'static str,
    pub glsl: &'static str,
}

pub const VERTEX_SHADER: ShaderSource = ShaderSource {
    name: "triangle.vert",
    glsl: include_str!("../shaders/triangle.vert"),
};

pub const FRAGMENT_SHADER: ShaderSource = ShaderSource {
    name: "triangle.frag",
    glsl: include_str!("../shaders/triangle.frag"),
};

pub fn shader_kind(path: &Path) -> Result<ShaderKind, ShaderError> {
    let kind = match path.extension().and_then(|e| e.to_str()) {
        Some("vert") => ShaderKind::Vertex,
        Some("frag") => ShaderKind::Fragment,
        Some("comp") => ShaderKind::Compute,
        Some("geom") => ShaderKind::Geometry,
        Some("tesc") => ShaderKind::TessControl,
        Some("tese") => ShaderKind::TessEvaluation,
        _ => return Err(ShaderError::UnknownKind(path.display().to_string())),
    };
    Ok(kind)
}

/// Reinterprets little-endian SPIR-V bytes as words, checking size and magic.
pub fn spirv_words(bytes: &[u8]) -> Result<Vec<u32>, ShaderError> {
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(ShaderError::Misaligned(bytes.len()));
    }

    let words = bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect::<Vec<_>>();

    if words[0] != SPIRV_MAGIC {
        return Err(ShaderError::BadMagic(words[0]));
    }

    Ok(words)
}

/// Produces SPIR-V for each stage, either from the built-in sources or from
/// a directory holding `<name>.spv` bytecode or `<name>` GLSL.
pub struct ShaderLoader {
    compiler: shaderc::Compiler,
    dir: Option<PathBuf>,
}

impl ShaderLoader {
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let compiler = shaderc::Compiler::new()
            .map_err(|e| anyhow!("Failed to initialize shader compiler: {}", e))?;
        Ok(Self { compiler, dir })
    }

    pub fn load(&self, source: ShaderSource) -> Result<Vec<u32>> {
        let Some(dir) = &self.dir else {
            return self.compile(source.glsl, source.name);
        };

        let bytecode_path = dir.join(format!("{}.spv", source.name));
        if bytecode_path.is_file() {
            log::info!("Loading shader bytecode `{}`", bytecode_path.display());
            let bytes = fs::read(&bytecode_path)
                .with_context(|| format!("reading {}", bytecode_path.display()))?;
            return Ok(spirv_words(&bytes)?);
        }

        let source_path = dir.join(source.name);
        log::info!("Compiling shader `{}`", source_path.display());
        let glsl = fs::read_to_string(&source_path)
            .with_context(|| format!("reading {}", source_path.display()))?;
        self.compile(&glsl, source.name)
    }

    pub fn compile(&self, glsl: &str, name: &str) -> Result<Vec<u32>> {
        let kind = shader_kind(Path::new(name))?;
        let artifact = self
            .compiler
            .compile_into_spirv(glsl, kind, name, "main", None)
            .map_err(|e| ShaderError::Compile {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        if artifact.get_num_warnings() > 0 {
            log::warn!("{}: {}", name, artifact.get_warning_messages());
        }

        Ok(artifact.as_binary().to_vec())
    }
}

pub unsafe fn create_shader_module(device: &Device, code: &[u32]) -> Result<vk::ShaderModule> {
    let info = vk::ShaderModuleCreateInfo::builder()
        .code_size(std::mem::size_of_val(code))
        .code(code);

    Ok(device.create_shader_module(&info, None)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spirv_words_rejects_empty_input() {
        assert!(matches!(spirv_words(&[]), Err(ShaderError::Misaligned(0))));
    }
}
