use crate::ast::BlockId;
use crc32fast::Hasher;

/// Generate document ID from file path using CRC32
pub fn get_document_id(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential identity generator for blocks within a document.
///
/// The host owns one generator per document and threads it through every
/// parse and block instantiation, so identities stay unique across the
/// live tree and any fragment content parsed during the same session.
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String, // Document ID (CRC32)
    count: u32,   // Sequential counter
}

impl IDGenerator {
    pub fn new(path: &str) -> Self {
        Self {
            seed: get_document_id(path),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential identity
    pub fn new_id(&mut self) -> BlockId {
        self.count += 1;
        BlockId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Get document ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("/page.blk");
        let id2 = get_document_id("/page.blk");

        // Same path always generates same ID
        assert_eq!(id1, id2);

        // Different paths generate different IDs
        let id3 = get_document_id("/other.blk");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IDGenerator::new("/page.blk");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        // IDs are sequential
        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id3.as_str().ends_with("-3"));

        // All share same seed
        let seed = gen.seed().to_string();
        assert!(id1.as_str().starts_with(&seed));
        assert!(id2.as_str().starts_with(&seed));
        assert!(id3.as_str().starts_with(&seed));
    }
}
