/// Configuration for reading bundles
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Rows decoded per Arrow record batch
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { batch_size: 65536 }
    }
}
