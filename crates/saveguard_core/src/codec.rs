//! Symmetric XOR obfuscation for serialized save data.
//!
//! Applying the transform twice returns the original bytes, so the same
//! call handles both directions. This only deters casual editing of the
//! save file in a text editor; it is not encryption in any cryptographic
//! sense and must not be treated as one.

#[derive(Debug, Clone)]
pub struct Codec {
    key: Vec<u8>,
}

impl Codec {
    /// Builds a codec from a keyword. The keyword must be non-empty.
    pub fn new(key: &str) -> Self {
        assert!(!key.is_empty(), "codec keyword must be non-empty");
        Self {
            key: key.as_bytes().to_vec(),
        }
    }

    /// XORs every byte with the key byte at the same position modulo the
    /// key length. Pure and infallible for any input, including empty.
    pub fn transform(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .enumerate()
            .map(|(i, b)| b ^ self.key[i % self.key.len()])
            .collect()
    }
}
