//! # file-dedup CLI
//!
//! Command-line interface for the duplicate file cleaner.
//!
//! ## Usage
//! ```bash
//! file-dedup --path ~/Downloads
//! file-dedup --path ~/Downloads --duplicates --rename
//! file-dedup -p ~/Downloads -d --output json
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
