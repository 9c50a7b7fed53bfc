use imglabel_domain::{lblerr, LblResult};
use lazy_static::lazy_static;
use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{error, info};

lazy_static! {
    pub static ref DEFAULT_TMPDIR: PathBuf = std::env::temp_dir().join("imglabel");
}
lazy_static! {
    pub static ref DEFAULT_HOMEDIR: PathBuf = match dirs::home_dir() {
        Some(p) => p.join(".imglabel"),
        _ => std::env::temp_dir().join("imglabel"),
    };
}

pub fn read_to_string<P>(p: P) -> LblResult<String>
where
    P: AsRef<Path> + Debug,
{
    fs::read_to_string(&p).map_err(|e| lblerr!("could not read {:?} due to {:?}", p, e))
}

pub fn write<P, C>(path: P, contents: C) -> LblResult<()>
where
    P: AsRef<Path> + Debug,
    C: AsRef<[u8]>,
{
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)
            .map_err(|e| lblerr!("could not create folder {:?} since {:?}", parent, e))?;
    }
    fs::write(&path, contents).map_err(|e| lblerr!("could not write to {:?} since {:?}", path, e))
}

pub struct Defer<F: FnMut()> {
    pub func: F,
}
impl<F: FnMut()> Drop for Defer<F> {
    fn drop(&mut self) {
        (self.func)();
    }
}
#[macro_export]
macro_rules! defer {
    ($f:expr) => {
        let _dfr = $crate::file_util::Defer { func: $f };
    };
}
pub fn checked_remove<'a, P: AsRef<Path> + Debug>(
    path: &'a P,
    func: fn(p: &'a P) -> io::Result<()>,
) {
    match func(path) {
        Ok(()) => info!("removed {path:?}"),
        Err(e) => error!("could not remove {path:?} due to {e:?}"),
    }
}
#[macro_export]
macro_rules! defer_folder_removal {
    ($path:expr) => {
        let func = || $crate::file_util::checked_remove($path, std::fs::remove_dir_all);
        $crate::defer!(func);
    };
}

#[test]
fn test_write_read() {
    let folder = DEFAULT_TMPDIR.join("test_write_read");
    defer_folder_removal!(&folder);
    let file = folder.join("nested").join("file.txt");
    write(&file, "imglabel").unwrap();
    assert_eq!(read_to_string(&file).unwrap(), "imglabel");
    assert!(read_to_string(folder.join("missing.txt")).is_err());
}
