use std::env;

use anyhow::Result;
use mdpage::{Config, publish};

fn main() {
    if let Err(problem) = run() {
        eprintln!("{problem}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let root = env::current_dir()?;
    publish(&Config::rooted_at(root))?;
    Ok(())
}
