use crate::domain::ArchiverInfo;
use crate::ports::ArchiverDirectory;

/// Fixed archiver list taken from the node config.
#[derive(Clone, Debug, Default)]
pub struct StaticArchiverList {
    archivers: Vec<ArchiverInfo>,
}

impl StaticArchiverList {
    pub fn new(archivers: Vec<ArchiverInfo>) -> Self {
        Self { archivers }
    }
}

impl ArchiverDirectory for StaticArchiverList {
    fn archivers(&self) -> Vec<ArchiverInfo> {
        self.archivers.clone()
    }
}
