use std::process::Command;

fn git_cmd(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn main() {
    let git_hash = git_cmd(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let is_dirty = git_cmd(&["status", "--porcelain"]).is_some_and(|o| !o.is_empty());
    let build = match (git_hash.is_empty(), is_dirty) {
        (true, _) => "unknown".to_string(),
        (false, true) => format!("{git_hash}-dirty"),
        (false, false) => git_hash,
    };
    println!("cargo:rustc-env=IMGLABEL_BUILD={build}");
}
