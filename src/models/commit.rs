use serde::Serialize;

/// A commit as read from the version-control log, before it is stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GitCommit {
    pub hash: String,
    pub author: String,
    pub date: String, // verbatim `%ad`
    pub message: String,
}

/// A stored commit. `session_id == None` means unassociated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Commit {
    pub id: i64,
    pub session_id: Option<i64>,
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: String,
}
