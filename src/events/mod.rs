//! # Events Module
//!
//! Structured run reporting.
//!
//! ## Design
//! The core library never writes to the console. It emits events through a
//! channel and the caller (CLI, tests, a future GUI) decides how to render
//! them.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Scan(ScanEvent::DuplicateFound { duplicate_path, .. }) => {
//!                 println!("duplicate: {}", duplicate_path.display())
//!             }
//!             Event::Rename(RenameEvent::FileRenamed { old_path, new_path }) => {
//!                 println!("{} -> {}", old_path.display(), new_path.display())
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
