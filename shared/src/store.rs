use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::error::Result;
use crate::models::{StoreData, Tally, VoteKind};
use crate::voter::{fingerprint, generate_salt};

/// Per-site tallies plus the per-rotation dedup ledger, mirrored to a JSON file.
#[derive(Debug)]
pub struct VoteStore {
    data: StoreData,
    salt: String,
    path: PathBuf,
}

impl VoteStore {
    pub fn new(path: impl Into<PathBuf>, data: StoreData) -> Result<Self> {
        Ok(Self {
            data,
            salt: generate_salt()?,
            path: path.into(),
        })
    }

    /// Loads the file at `path`. A missing or unreadable file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<StoreData>(&bytes) {
                Ok(data) => {
                    info!("Loaded {} site tallies from {}", data.counts.len(), path.display());
                    data
                }
                Err(e) => {
                    warn!("Vote file {} is not valid JSON, starting empty: {}", path.display(), e);
                    StoreData::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No vote file at {}, starting empty", path.display());
                StoreData::default()
            }
            Err(e) => {
                warn!("Failed to read vote file {}, starting empty: {}", path.display(), e);
                StoreData::default()
            }
        };

        Self::new(path, data)
    }

    pub fn cast_vote(&mut self, site: &str, ip: &str, vote: &str) {
        let id = fingerprint(&self.salt, ip);
        let ledger = self.data.latest.entry(site.to_string()).or_default();
        let tally = self.data.counts.entry(site.to_string()).or_default();

        if let Some(previous) = ledger.get(&id).and_then(|v| VoteKind::classify(v)) {
            tally.retract(previous);
        }

        if let Some(kind) = VoteKind::classify(vote) {
            tally.record(kind);
        }

        debug!(site, vote, up = tally.up(), down = tally.down(), "Vote cast");
        ledger.insert(id, vote.to_string());
    }

    /// Current approval percentage. Creates an empty tally for unseen sites.
    pub fn percent(&mut self, site: &str) -> i64 {
        self.data.counts.entry(site.to_string()).or_default().percent()
    }

    /// Clears the dedup ledger and draws a new salt. Tallies are untouched.
    pub fn rotate(&mut self) -> Result<()> {
        self.data.latest.clear();
        self.salt = generate_salt()?;
        debug!("Voter salt rotated");
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.data)?;
        fs::write(&self.path, bytes)?;
        info!("Saved {} site tallies to {}", self.data.counts.len(), self.path.display());
        Ok(())
    }

    /// Rotate, then write. A failed rotation still leaves the ledger cleared and is
    /// reported after the write has been attempted.
    pub fn save_and_rotate(&mut self) -> Result<()> {
        let rotated = self.rotate();
        self.save()?;
        rotated
    }

    pub fn tally(&self, site: &str) -> Option<Tally> {
        self.data.counts.get(site).copied()
    }

    pub fn latest_vote(&self, site: &str, ip: &str) -> Option<&str> {
        let id = fingerprint(&self.salt, ip);
        self.data.latest.get(site)?.get(&id).map(String::as_str)
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
