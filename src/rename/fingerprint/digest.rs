use digest::Digest;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::Fingerprinter;
use crate::rename::error::RenameResult;
use crate::rename::types::{FileTask, Fingerprint, HashAlgorithm};

/// Read buffer for streaming file content through the hasher
const CHUNK_SIZE: usize = 64 * 1024;

/// Content digest fingerprint, hex encoded in lowercase
#[derive(Debug, Clone, Copy)]
pub struct DigestFingerprinter {
    algorithm: HashAlgorithm,
}

impl DigestFingerprinter {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn digest_path(&self, path: &Path) -> RenameResult<String> {
        match self.algorithm {
            HashAlgorithm::Md5 => digest_file::<md5::Md5>(path),
            HashAlgorithm::Sha1 => digest_file::<sha1::Sha1>(path),
            HashAlgorithm::Sha224 => digest_file::<sha2::Sha224>(path),
            HashAlgorithm::Sha256 => digest_file::<sha2::Sha256>(path),
            HashAlgorithm::Sha384 => digest_file::<sha2::Sha384>(path),
            HashAlgorithm::Sha512 => digest_file::<sha2::Sha512>(path),
        }
    }
}

impl Fingerprinter for DigestFingerprinter {
    fn fingerprint(&self, task: &FileTask) -> RenameResult<Fingerprint> {
        let hex = self.digest_path(task.path())?;
        tracing::trace!("{} {}: {}", self.algorithm, task.path().display(), hex);
        Ok(Fingerprint::Digest(hex))
    }
}

fn digest_file<D: Digest>(path: &Path) -> RenameResult<String>
where
    <D as digest::OutputSizeUser>::OutputSize: std::ops::Add,
    <<D as digest::OutputSizeUser>::OutputSize as std::ops::Add>::Output:
        digest::generic_array::ArrayLength<u8>,
{
    let mut file = File::open(path)?;
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
