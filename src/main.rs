// SPDX-License-Identifier: MIT
//
// npunct: replay one keystroke through the auto-punctuation engine.
//
//   npunct Token.sol --at 12:19            type `;` at line 12, column 19
//   npunct Token.sol --at 3:9 --char '"'   type a quote
//   npunct Token.sol --at 12:19 --write    write the result back
//
// The file is loaded into a Document, the char is typed at the given
// position exactly as an editor would deliver it (before-typed handler,
// raw insert, after-typed handler), and the resulting text goes to stdout.
// The final caret is reported on stderr as LINE:COL.
//
// Files the engine doesn't recognize get only the raw insertion.

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use n_editor::buffer::Buffer;
use n_editor::document::Document;
use n_editor::position::Position;
use n_punct::quote::is_quote;
use n_punct::{OptionError, PunctOptions, Punctuator};

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "npunct",
    version,
    about = "Type a char into a file the way the editor would, with smart punctuation"
)]
struct Args {
    /// File to edit.
    file: PathBuf,

    /// Where the caret is before the keystroke (1-indexed).
    #[arg(long, value_name = "LINE:COL")]
    at: Position,

    /// The char to type: `;`, `"` or `'`.
    #[arg(long = "char", value_name = "CHAR", default_value_t = ';')]
    key: char,

    /// Option directives, as for `:set` (e.g. "noaq semiwindow=200").
    #[arg(long = "set", value_name = "DIRECTIVES")]
    set: Option<String>,

    /// Write the result back to FILE instead of printing it.
    #[arg(long)]
    write: bool,
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("--set: {0}")]
    Options(#[from] OptionError),

    #[error("{at} is outside {}", path.display())]
    OutOfRange { at: Position, path: PathBuf },

    #[error("cannot type {0:?}: expected ';', '\"' or '\\''")]
    UnsupportedChar(char),
}

impl CliError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ─── Replay ─────────────────────────────────────────────────────────────────

/// Type `key` into `buffer` with the caret at `at`. Returns `None` if `at`
/// is not a position in the buffer.
fn replay(buffer: Buffer, at: Position, key: char, punct: &Punctuator) -> Option<Document> {
    let caret = buffer.offset_of(at)?;
    let mut doc = Document::new(buffer).with_caret(caret);
    let handled = punct.type_char(&mut doc, key);
    debug!(?handled, language = ?punct.language(), "keystroke replayed");
    Some(doc)
}

fn run(args: &Args) -> Result<(), CliError> {
    if args.key != ';' && !is_quote(args.key) {
        return Err(CliError::UnsupportedChar(args.key));
    }

    let mut options = PunctOptions::default();
    if let Some(directives) = &args.set {
        for line in options.apply_str(directives)? {
            eprintln!("{line}");
        }
    }

    let buffer = Buffer::from_file(&args.file).map_err(CliError::io(&args.file))?;
    let punct = Punctuator::for_path(&args.file, options);
    let doc = replay(buffer, args.at, args.key, &punct).ok_or_else(|| CliError::OutOfRange {
        at: args.at,
        path: args.file.clone(),
    })?;

    let caret = doc.caret_position();
    let mut buffer = doc.into_buffer();
    if args.write {
        buffer.save_as(&args.file).map_err(CliError::io(&args.file))?;
    } else {
        print!("{}", buffer.contents());
    }
    eprintln!("{caret}");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "n_punct=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("npunct: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
