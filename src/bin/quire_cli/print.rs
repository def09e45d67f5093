#![deny(clippy::all, clippy::pedantic)]

use serde::Serialize;

use quire::application::error::{Notice, NoticeLevel};

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

/// Render a notice on stderr; blocking notices are framed so they stand out.
pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Toast => eprintln!("{}: {}", notice.title, notice.message),
        NoticeLevel::Blocking => {
            let rule = "=".repeat(notice.title.len().max(notice.message.len()).min(72));
            eprintln!("{rule}\n{}\n{}\n{rule}", notice.title, notice.message);
        }
    }
}
