// Tue Jan 13 2026 - Alex

pub mod xml;

pub use xml::XmlSerializer;

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serialized registry of one discovery pass. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDocument {
    xml: String,
    unit_count: usize,
}

impl RegistryDocument {
    pub(crate) fn new(xml: String, unit_count: usize) -> Self {
        Self { xml, unit_count }
    }

    pub fn as_str(&self) -> &str {
        &self.xml
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    pub fn byte_len(&self) -> usize {
        self.xml.len()
    }

    /// Overwrites whatever is at `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.xml.as_bytes())?;
        writer.flush()
    }
}

impl fmt::Display for RegistryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml)
    }
}

impl AsRef<str> for RegistryDocument {
    fn as_ref(&self) -> &str {
        &self.xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_to_replaces_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("registry.xml");
        fs::write(&path, "a much longer document from an earlier pass").unwrap();

        let document = RegistryDocument::new("<TestCases/>\n".to_string(), 0);
        document.write_to(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<TestCases/>\n");
        assert_eq!(document.byte_len(), 13);
        assert_eq!(document.to_string(), document.as_str());
    }
}
