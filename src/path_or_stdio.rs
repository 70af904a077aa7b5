use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// Where machine-readable output goes: a file, or stdout for `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOrStdio {
    Path(PathBuf),
    Stdio,
}

impl From<String> for PathOrStdio {
    fn from(s: String) -> Self {
        if s == "-" {
            PathOrStdio::Stdio
        } else {
            PathOrStdio::Path(PathBuf::from(s))
        }
    }
}

impl PathOrStdio {
    pub fn filepath(&self) -> String {
        match self {
            PathOrStdio::Path(p) => p.display().to_string(),
            PathOrStdio::Stdio => "stdout".to_string(),
        }
    }

    pub fn writer(&self) -> io::Result<Box<dyn io::Write>> {
        match self {
            PathOrStdio::Path(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
            PathOrStdio::Stdio => Ok(Box::new(io::stdout())),
        }
    }
}
