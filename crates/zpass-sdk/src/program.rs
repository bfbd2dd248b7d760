use crate::error::{Result, SdkError};

/// Parsed view of a program source: its id, declared functions, and imports.
///
/// The parser only reads the line-level structure it needs for orchestration
/// decisions. Full semantic validation belongs to the cryptographic engine.
#[derive(Clone, Debug)]
pub struct ProgramHandle {
    id: String,
    functions: Vec<String>,
    imports: Vec<String>,
}

impl ProgramHandle {
    pub fn parse(source: &str) -> Result<Self> {
        let mut id = None;
        let mut functions = Vec::new();
        let mut imports = Vec::new();

        for line in source.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("import ") {
                if let Some(import_id) = rest.strip_suffix(';') {
                    imports.push(import_id.trim().to_string());
                }
            } else if let Some(rest) = line.strip_prefix("program ") {
                if let Some(program_id) = rest.strip_suffix(';') {
                    id = Some(program_id.trim().to_string());
                }
            } else if let Some(rest) = line.strip_prefix("function ") {
                if let Some(name) = rest.strip_suffix(':') {
                    functions.push(name.trim().to_string());
                }
            }
        }

        let id = id.ok_or_else(|| {
            SdkError::Precondition("program source has no program declaration".to_string())
        })?;

        Ok(Self { id, functions, imports })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn has_function(&self, function_name: &str) -> bool {
        self.functions.iter().any(|f| f == function_name)
    }

    /// Fail fast with a typed error when the requested function is absent,
    /// before any key synthesis or network round trip happens.
    pub fn expect_function(&self, function_name: &str) -> Result<()> {
        if self.has_function(function_name) {
            return Ok(());
        }
        Err(SdkError::NotFound(format!(
            "program {} does not contain function {}",
            self.id, function_name
        )))
    }

    /// Cache key tying synthesized keys to one function of this program.
    pub fn cache_key(&self, function_name: &str) -> String {
        format!("{}:{}", self.id, function_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r"
import helper.aleo;

program credential_v1.aleo;

function issue:
    input r0 as u8.private;
    output r0 as u8.private;

function revoke:
    input r0 as field.private;
";

    #[test]
    fn test_parse_program() {
        let handle = ProgramHandle::parse(SOURCE).unwrap();
        assert_eq!(handle.id(), "credential_v1.aleo");
        assert_eq!(handle.imports(), ["helper.aleo"]);
        assert!(handle.has_function("issue"));
        assert!(handle.has_function("revoke"));
        assert!(!handle.has_function("transfer"));
        assert_eq!(handle.cache_key("issue"), "credential_v1.aleo:issue");
    }

    #[test]
    fn test_expect_function_missing() {
        let handle = ProgramHandle::parse(SOURCE).unwrap();
        let err = handle.expect_function("transfer").unwrap_err();
        assert_eq!(
            err.to_string(),
            "program credential_v1.aleo does not contain function transfer"
        );
        assert!(matches!(err, SdkError::NotFound(_)));
    }

    #[test]
    fn test_parse_requires_program_declaration() {
        let err = ProgramHandle::parse("function issue:\n").unwrap_err();
        assert!(matches!(err, SdkError::Precondition(_)));
    }
}
