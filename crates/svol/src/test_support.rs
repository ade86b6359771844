//! Test support utilities shared by unit and integration tests.
//! Public so `tests/` can reach them; not used by the binary.

use std::{
    env, fs, process,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// Create a fresh, empty directory under the system temp dir.
///
/// The name combines `name`, the process id and the current time, so parallel
/// tests and repeated runs never share a directory.
pub fn unique_tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let mut dir = env::temp_dir();
    dir.push(format!("svol-{name}-{}-{nanos}", process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
